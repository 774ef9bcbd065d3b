use crate::{
    db,
    error::{AppError, AppResult},
    models::{SafeUser, UserType},
    utils::{auth::Claims, AuthUser, Config},
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.user_type == UserType::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Not authorized"))
    }
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_premium: bool,
    pub join_date: DateTime<Utc>,
    pub trips_completed: i64,
}

pub async fn list_users(
    AuthUser(claims): AuthUser,
    Query(query): Query<UserListQuery>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<AdminUserView>>> {
    require_admin(&claims)?;

    let premium = match query.filter.as_deref() {
        Some("premium") => Some(true),
        Some("regular") => Some(false),
        _ => None,
    };
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let users = db::users::list_customers(&pool, search, premium).await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| AdminUserView {
                id: user.id,
                name: user.name,
                email: user.email,
                is_premium: user.is_premium,
                join_date: user.created_at,
                trips_completed: user.trips_completed,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub is_premium: Option<bool>,
}

pub async fn update_user(
    AuthUser(claims): AuthUser,
    Path(user_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<SafeUser>> {
    require_admin(&claims)?;

    let is_premium = req
        .is_premium
        .ok_or_else(|| AppError::validation("is_premium is required"))?;

    let user = db::users::set_premium(&pool, user_id, is_premium)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user))
}

pub async fn delete_user(
    AuthUser(claims): AuthUser,
    Path(user_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&claims)?;

    if db::users::delete_user(&pool, user_id).await? == 0 {
        return Err(AppError::not_found("User not found"));
    }

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
