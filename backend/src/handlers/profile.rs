use crate::{
    db,
    error::{AppError, AppResult},
    models::SafeUser,
    utils::{
        auth::{hash_password, verify_password},
        AuthUser, Config,
    },
};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn get_profile(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<SafeUser>> {
    let user = db::users::get_user_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub interests: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

pub async fn update_profile(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<SafeUser>> {
    let user = db::users::update_profile(
        &pool,
        claims.sub,
        req.name.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        req.phone.as_deref(),
        req.interests.as_deref(),
        req.location.as_deref(),
        req.bio.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn change_password(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let (current, new) = match (req.current_password, req.new_password) {
        (Some(c), Some(n)) if !n.is_empty() => (c, n),
        _ => {
            return Err(AppError::validation(
                "Current password and new password are required",
            ))
        }
    };

    let user = db::users::get_user_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if !verify_password(&current, &user.password) {
        return Err(AppError::validation("Current password is incorrect"));
    }

    let new_hash = hash_password(&new)?;
    db::users::update_password(&pool, claims.sub, &new_hash).await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

#[derive(Debug, Serialize)]
pub struct CompletedTripView {
    pub id: Uuid,
    pub destination: String,
    pub date: String,
    pub rating: i32,
}

/// Past trips with the caller's own rating, for the profile history tab.
pub async fn completed_trips(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<CompletedTripView>>> {
    let trips = db::trips::list_completed_trips(&pool, claims.sub).await?;

    Ok(Json(
        trips
            .into_iter()
            .map(|trip| CompletedTripView {
                id: trip.id,
                destination: trip.destination,
                date: trip.end_date.format("%Y-%m-%d").to_string(),
                rating: trip.rating.unwrap_or(0),
            })
            .collect(),
    ))
}
