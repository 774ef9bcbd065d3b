use crate::constants::DEFAULT_SERVER_PORT;
use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub rapidapi_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_pass: env::var("SMTP_PASS").ok(),
            rapidapi_key: env::var("RAPIDAPI_KEY").ok(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
        })
    }
}
