use crate::{
    error::{AppError, AppResult},
    services::HotelSearchService,
    utils::Config,
};
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct HotelSearchQuery {
    pub destination: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// Proxies the two chained upstream calls (location lookup, then hotel
/// search) so the API key stays server-side.
pub async fn search_hotels(
    Query(query): Query<HotelSearchQuery>,
    State((_pool, config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let destination = query
        .destination
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::validation("Destination is required"))?;

    let api_key = config
        .rapidapi_key
        .clone()
        .ok_or_else(|| AppError::upstream("Hotel search is not configured"))?;

    let today = Utc::now().date_naive();
    let check_in = query
        .check_in
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let check_out = query
        .check_out
        .unwrap_or_else(|| (today + Duration::days(1)).format("%Y-%m-%d").to_string());

    let service = HotelSearchService::new(api_key);

    let geo_id = service.search_location(destination).await.map_err(|e| {
        tracing::error!("Hotel location lookup failed: {}", e);
        AppError::upstream("Failed to search hotels")
    })?;

    let geo_id = geo_id.ok_or_else(|| AppError::not_found("Location not found"))?;

    let hotels = service
        .search_hotels(geo_id, &check_in, &check_out)
        .await
        .map_err(|e| {
            tracing::error!("Hotel search failed: {}", e);
            AppError::upstream("Failed to search hotels")
        })?;

    Ok(Json(json!({ "hotels": hotels })))
}
