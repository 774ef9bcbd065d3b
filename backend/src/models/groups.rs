use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupPost {
    pub id: Uuid,
    pub group_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub location: Option<String>,
    pub post_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Listing row: group with its creator identity and post count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub creator_name: String,
    pub creator_avatar: Option<String>,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post joined with its author's identity, newest first.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupPostWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub location: Option<String>,
    pub post_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}
