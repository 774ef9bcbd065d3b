use crate::{
    constants::MESSAGE_PAGE_LIMIT,
    db,
    error::{AppError, AppResult},
    models::{ChatBuddy, ChatMemberInfo, MessageWithSender},
    utils::{AuthUser, Config},
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ChatView {
    pub id: Uuid,
    pub name: Option<String>,
    pub is_group: bool,
    pub members: Vec<ChatMemberInfo>,
    pub last_message: Option<MessageWithSender>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list_chats(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let chats = db::chats::list_chats_for_user(&pool, claims.sub).await?;

    let mut views = Vec::with_capacity(chats.len());
    for chat in chats {
        let members = db::chats::list_members(&pool, chat.id).await?;
        let last_message = db::chats::latest_message(&pool, chat.id).await?;

        views.push(ChatView {
            id: chat.id,
            name: chat.name,
            is_group: chat.is_group,
            members,
            last_message,
            updated_at: chat.updated_at,
        });
    }

    Ok(Json(json!({ "chats": views })))
}

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub member_ids: Option<Vec<Uuid>>,
    pub name: Option<String>,
}

/// Direct chats are deduplicated: asking for a 1:1 with an existing
/// counterpart returns the existing chat id.
pub async fn create_chat(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreateChatRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let member_ids = req
        .member_ids
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| AppError::validation("member_ids required"))?;

    let mut unique: Vec<Uuid> = Vec::new();
    let mut seen = HashSet::new();
    for id in std::iter::once(claims.sub).chain(member_ids) {
        if seen.insert(id) {
            unique.push(id);
        }
    }

    let is_group = unique.len() > 2;

    if !is_group && unique.len() == 2 {
        if let Some(chat_id) = db::chats::find_direct_chat(&pool, unique[0], unique[1]).await? {
            return Ok(Json(json!({ "chat_id": chat_id })));
        }
    }

    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let chat = db::chats::create_chat(&pool, name, is_group, &unique).await?;

    Ok(Json(json!({ "chat_id": chat.id })))
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub after: Option<DateTime<Utc>>,
}

/// Short-poll endpoint: the client passes its newest seen timestamp as
/// `after` and re-fetches on an interval.
pub async fn list_messages(
    AuthUser(claims): AuthUser,
    Path(chat_id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    if !db::chats::is_member(&pool, chat_id, claims.sub).await? {
        return Err(AppError::forbidden("Not a member of this chat"));
    }

    let messages =
        db::chats::list_messages(&pool, chat_id, query.after, MESSAGE_PAGE_LIMIT).await?;

    Ok(Json(json!({ "messages": messages, "now": Utc::now() })))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: Option<String>,
}

pub async fn send_message(
    AuthUser(claims): AuthUser,
    Path(chat_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let content = req
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Empty message"))?;

    if !db::chats::is_member(&pool, chat_id, claims.sub).await? {
        return Err(AppError::forbidden("Not a member of this chat"));
    }

    let message = db::chats::create_message(&pool, chat_id, claims.sub, content).await?;

    Ok(Json(json!({ "id": message.id })))
}

pub async fn chat_buddies(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let buddies: Vec<ChatBuddy> = db::buddies::accepted_chat_buddies(&pool, claims.sub).await?;

    Ok(Json(json!({ "buddies": buddies })))
}
