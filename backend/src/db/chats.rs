use crate::models::{Chat, ChatMemberInfo, Message, MessageWithSender};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const CHAT_COLUMNS: &str = "id, name, is_group, created_at, updated_at";

/// Chats the user belongs to, most recently active first.
pub async fn list_chats_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Chat>> {
    let chats = sqlx::query_as::<_, Chat>(&format!(
        r#"
        SELECT {CHAT_COLUMNS} FROM chats c
        WHERE EXISTS(SELECT 1 FROM chat_members m WHERE m.chat_id = c.id AND m.user_id = $1)
        ORDER BY c.updated_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(chats)
}

/// An existing one-to-one chat between exactly these two users, if any.
pub async fn find_direct_chat(pool: &PgPool, user_a: Uuid, user_b: Uuid) -> Result<Option<Uuid>> {
    let chat_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT c.id FROM chats c
        WHERE NOT c.is_group
          AND EXISTS(SELECT 1 FROM chat_members m WHERE m.chat_id = c.id AND m.user_id = $1)
          AND EXISTS(SELECT 1 FROM chat_members m WHERE m.chat_id = c.id AND m.user_id = $2)
        LIMIT 1
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_optional(pool)
    .await?;

    Ok(chat_id)
}

pub async fn create_chat(
    pool: &PgPool,
    name: Option<&str>,
    is_group: bool,
    member_ids: &[Uuid],
) -> Result<Chat> {
    let mut tx = pool.begin().await?;

    let chat = sqlx::query_as::<_, Chat>(&format!(
        "INSERT INTO chats (name, is_group) VALUES ($1, $2) RETURNING {CHAT_COLUMNS}"
    ))
    .bind(name)
    .bind(is_group)
    .fetch_one(&mut *tx)
    .await?;

    for member_id in member_ids {
        sqlx::query(
            "INSERT INTO chat_members (chat_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(chat.id)
        .bind(member_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(chat)
}

pub async fn is_member(pool: &PgPool, chat_id: Uuid, user_id: Uuid) -> Result<bool> {
    let member = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM chat_members WHERE chat_id = $1 AND user_id = $2)",
    )
    .bind(chat_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(member)
}

pub async fn list_members(pool: &PgPool, chat_id: Uuid) -> Result<Vec<ChatMemberInfo>> {
    let members = sqlx::query_as::<_, ChatMemberInfo>(
        r#"
        SELECT u.id AS user_id, u.name, u.email
        FROM chat_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.chat_id = $1
        ORDER BY m.joined_at ASC
        "#,
    )
    .bind(chat_id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.chat_id, m.sender_id, u.name AS sender_name, m.content, m.created_at
    FROM messages m
    JOIN users u ON u.id = m.sender_id
"#;

pub async fn latest_message(pool: &PgPool, chat_id: Uuid) -> Result<Option<MessageWithSender>> {
    let message = sqlx::query_as::<_, MessageWithSender>(&format!(
        "{MESSAGE_SELECT} WHERE m.chat_id = $1 ORDER BY m.created_at DESC LIMIT 1"
    ))
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

/// Messages in creation order; `after` is the client's poll cursor.
pub async fn list_messages(
    pool: &PgPool,
    chat_id: Uuid,
    after: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<MessageWithSender>> {
    let messages = sqlx::query_as::<_, MessageWithSender>(&format!(
        r#"{MESSAGE_SELECT}
        WHERE m.chat_id = $1 AND ($2::timestamptz IS NULL OR m.created_at > $2)
        ORDER BY m.created_at ASC
        LIMIT $3
        "#
    ))
    .bind(chat_id)
    .bind(after)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Inserts the message and bumps the chat's activity timestamp.
pub async fn create_message(
    pool: &PgPool,
    chat_id: Uuid,
    sender_id: Uuid,
    content: &str,
) -> Result<Message> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (chat_id, sender_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, chat_id, sender_id, content, created_at
        "#,
    )
    .bind(chat_id)
    .bind(sender_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE chats SET updated_at = NOW() WHERE id = $1")
        .bind(chat_id)
        .execute(pool)
        .await?;

    Ok(message)
}
