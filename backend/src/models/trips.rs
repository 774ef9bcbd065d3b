use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum TripStatus {
    Open,
    Ongoing,
    Ended,
}

impl std::str::FromStr for TripStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "ONGOING" => Ok(Self::Ongoing),
            "ENDED" => Ok(Self::Ended),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ParticipantRole {
    Creator,
    Participant,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub description: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub status: TripStatus,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripParticipant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub role: ParticipantRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub trip_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Participant row joined with the member's public identity.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParticipantInfo {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub role: ParticipantRole,
    pub joined_at: DateTime<Utc>,
}

/// Listing row: trip with creator identity and live participant count.
#[derive(Debug, Clone, FromRow)]
pub struct TripCard {
    pub id: Uuid,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub description: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub status: TripStatus,
    pub creator_id: Uuid,
    pub creator_name: String,
    pub creator_avatar: Option<String>,
    pub participant_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Past trip with the caller's own review rating, for the profile page.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedTripRow {
    pub id: Uuid,
    pub destination: String,
    pub end_date: DateTime<Utc>,
    pub rating: Option<i32>,
}
