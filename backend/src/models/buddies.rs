use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Directed edge: requester -> receiver, unique per ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BuddyRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counterpart profile row used by the directory, pending-request, and
/// accepted-buddy views. `trips_completed` counts trips the user created.
#[derive(Debug, Clone, FromRow)]
pub struct BuddyProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<String>,
    pub trips_completed: i64,
}

/// Candidate row fed into the matchmaking scan: a user plus every blog id
/// they liked or wishlisted (union, aggregated in SQL).
#[derive(Debug, Clone, FromRow)]
pub struct MatchCandidate {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub interests: Option<String>,
    pub trips_completed: i64,
    pub blog_ids: Vec<Uuid>,
}

/// A pending request with the counterpart's profile, flattened for the
/// incoming/outgoing views.
#[derive(Debug, Clone, FromRow)]
pub struct PendingRequestRow {
    pub id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub user_location: Option<String>,
    pub user_bio: Option<String>,
    pub user_interests: Option<String>,
    pub trips_completed: i64,
}
