use crate::{
    error::{AppError, AppResult},
    services::DestinationService,
    utils::Config,
};
use axum::{extract::State, response::Json};
use serde_json::json;
use sqlx::PgPool;

/// One generative-AI call; the multi-line reply is split into a destination
/// name and a description.
pub async fn random_destination(
    State((_pool, config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let api_key = config
        .gemini_api_key
        .clone()
        .ok_or_else(|| AppError::upstream("Destination suggestions are not configured"))?;

    let service = DestinationService::new(api_key);

    let (destination, description) = service.random_destination().await.map_err(|e| {
        tracing::error!("Destination suggestion failed: {}", e);
        AppError::upstream("Failed to get destination suggestion")
    })?;

    Ok(Json(json!({
        "destination": destination,
        "description": description,
    })))
}
