use crate::utils::Config;
use anyhow::Result;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

/// Trip-creation notifications over SMTP. Delivery is best-effort: the trip
/// is already committed when the send happens, and a failure is only logged.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Returns `None` when SMTP credentials are not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let user = config.smtp_user.clone()?;
        let pass = config.smtp_pass.clone()?;
        let from: Mailbox = user.parse().ok()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay("smtp.gmail.com")
            .ok()?
            .credentials(Credentials::new(user, pass))
            .build();

        Some(Self { transport, from })
    }

    pub async fn send_trip_creation(
        &self,
        to_email: &str,
        to_name: &str,
        trip_description: &str,
    ) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to_email.parse()?)
            .subject("Trip Created Successfully")
            .body(format!(
                "Trip has been created for {to_name},\n\n\
                 Description & Safety Tips: {trip_description}\n\n\
                 Thank you for using our service!"
            ))?;

        self.transport.send(email).await?;
        Ok(())
    }
}

/// Fire-and-forget send on its own task; never blocks or fails the request.
pub fn spawn_trip_creation_email(config: &Config, to_email: String, to_name: String, trip_description: String) {
    let Some(mailer) = Mailer::from_config(config) else {
        tracing::warn!("SMTP not configured, skipping trip creation email");
        return;
    };

    tokio::spawn(async move {
        match mailer
            .send_trip_creation(&to_email, &to_name, &trip_description)
            .await
        {
            Ok(()) => tracing::info!("Trip creation email sent to {}", to_email),
            Err(e) => tracing::error!("Failed to send trip creation email: {}", e),
        }
    });
}
