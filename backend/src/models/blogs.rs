use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub preview: String,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub is_premium: bool,
    pub publish_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Listing row: blog plus the caller-dependent flags, joined in one query.
#[derive(Debug, Clone, FromRow)]
pub struct BlogCard {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub preview: String,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub publish_date: DateTime<Utc>,
    pub author_name: String,
    pub like_count: i64,
    pub is_liked: bool,
    pub is_wishlisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blog_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wishlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blog_id: Uuid,
    pub added_at: DateTime<Utc>,
}

/// Wishlist page row: the saved blog with its save timestamp.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistEntry {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub location: Option<String>,
    pub images: Vec<String>,
    pub publish_date: DateTime<Utc>,
    pub added_at: DateTime<Utc>,
}
