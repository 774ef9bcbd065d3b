use crate::{
    db,
    error::{is_unique_violation, AppError, AppResult},
    models::UserType,
    utils::{auth::Claims, AuthUser, Config},
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Community access is gated on the live premium flag, not the token claim,
/// so an admin toggle takes effect without re-login.
async fn require_premium(pool: &PgPool, claims: &Claims) -> AppResult<()> {
    let user = db::users::get_user_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

    if user.is_premium || user.user_type == UserType::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Premium membership required"))
    }
}

pub async fn list_groups(
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let groups = db::groups::list_groups(&pool).await?;

    Ok(Json(json!({ "groups": groups })))
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: Option<String>,
}

pub async fn create_group(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreateGroupRequest>,
) -> AppResult<Json<serde_json::Value>> {
    require_premium(&pool, &claims).await?;

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("Group name is required"))?;

    if db::groups::get_group_by_name(&pool, name).await?.is_some() {
        return Err(AppError::validation("Group name already exists"));
    }

    let group = db::groups::create_group(&pool, name, claims.sub)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::validation("Group name already exists")
            } else {
                AppError::Database(e)
            }
        })?;

    let summary = db::groups::get_group_summary(&pool, group.id)
        .await?
        .ok_or_else(|| AppError::not_found("Group not found"))?;

    Ok(Json(json!({ "group": summary })))
}

pub async fn get_group(
    AuthUser(claims): AuthUser,
    Path(group_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    require_premium(&pool, &claims).await?;

    let group = db::groups::get_group_summary(&pool, group_id)
        .await?
        .ok_or_else(|| AppError::not_found("Group not found"))?;

    let posts = db::groups::list_posts(&pool, group_id).await?;

    Ok(Json(json!({ "group": group, "posts": posts })))
}

pub async fn list_posts(
    AuthUser(claims): AuthUser,
    Path(group_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    require_premium(&pool, &claims).await?;

    if db::groups::get_group(&pool, group_id).await?.is_none() {
        return Err(AppError::not_found("Group not found"));
    }

    let posts = db::groups::list_posts(&pool, group_id).await?;

    Ok(Json(json!({ "posts": posts })))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub location: Option<String>,
    pub post_date: Option<DateTime<Utc>>,
}

pub async fn create_post(
    AuthUser(claims): AuthUser,
    Path(group_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<Json<serde_json::Value>> {
    require_premium(&pool, &claims).await?;

    let (title, content) = match (req.title.as_deref(), req.content.as_deref()) {
        (Some(t), Some(c)) if !t.trim().is_empty() && !c.trim().is_empty() => {
            (t.trim(), c.trim())
        }
        _ => return Err(AppError::validation("Title and content are required")),
    };

    if db::groups::get_group(&pool, group_id).await?.is_none() {
        return Err(AppError::not_found("Group not found"));
    }

    let location = req
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let post_date = req.post_date.unwrap_or_else(Utc::now);

    let post =
        db::groups::create_post(&pool, group_id, claims.sub, title, content, location, post_date)
            .await?;

    Ok(Json(json!({ "post": post })))
}
