use crate::{
    db,
    error::{AppError, AppResult},
    models::{TodoItem, TripParticipant},
    utils::{AuthUser, Config},
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Todo mutation is scoped to participants of the owning trip.
async fn require_participant(
    pool: &PgPool,
    user_id: Uuid,
    trip_id: Uuid,
) -> AppResult<TripParticipant> {
    db::trips::get_participant(pool, user_id, trip_id)
        .await?
        .ok_or_else(|| AppError::forbidden("Not a participant of this trip"))
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: Option<String>,
}

pub async fn create_todo(
    AuthUser(claims): AuthUser,
    Path(trip_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreateTodoRequest>,
) -> AppResult<Json<TodoItem>> {
    let text = req
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Todo text is required"))?;

    if db::trips::get_trip(&pool, trip_id).await?.is_none() {
        return Err(AppError::not_found("Trip not found"));
    }

    require_participant(&pool, claims.sub, trip_id).await?;

    let todo = db::trips::create_todo(&pool, trip_id, claims.sub, text).await?;

    Ok(Json(todo))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

pub async fn update_todo(
    AuthUser(claims): AuthUser,
    Path(todo_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<UpdateTodoRequest>,
) -> AppResult<Json<TodoItem>> {
    let todo = db::trips::get_todo(&pool, todo_id)
        .await?
        .ok_or_else(|| AppError::not_found("Todo item not found"))?;

    require_participant(&pool, claims.sub, todo.trip_id).await?;

    let updated =
        db::trips::update_todo(&pool, todo_id, req.text.as_deref(), req.completed).await?;

    Ok(Json(updated))
}

pub async fn delete_todo(
    AuthUser(claims): AuthUser,
    Path(todo_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let todo = db::trips::get_todo(&pool, todo_id)
        .await?
        .ok_or_else(|| AppError::not_found("Todo item not found"))?;

    require_participant(&pool, claims.sub, todo.trip_id).await?;

    db::trips::delete_todo(&pool, todo_id).await?;

    Ok(Json(json!({ "message": "Todo item deleted successfully" })))
}
