use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Upserted on (trip_id, reviewer_id): re-submitting overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripReview {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upserted on (trip_id, reviewer_id, buddy_id): re-submitting overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BuddyReview {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub reviewer_id: Uuid,
    pub buddy_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
