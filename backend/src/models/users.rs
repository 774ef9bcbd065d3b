use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum UserType {
    Customer,
    Admin,
}

/// Full user row. Only ever leaves the db layer; handlers respond with
/// [`SafeUser`] so the password hash never reaches the wire.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub interests: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub user_type: UserType,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SafeUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interests: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub user_type: UserType,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

/// Admin dashboard row: customer with their created-trip count.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub trips_completed: i64,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            interests: user.interests,
            avatar: user.avatar,
            location: user.location,
            bio: user.bio,
            user_type: user.user_type,
            is_premium: user.is_premium,
            created_at: user.created_at,
        }
    }
}
