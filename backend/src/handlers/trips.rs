use crate::{
    constants::{is_valid_trip_capacity, DEFAULT_TRIP_PARTICIPANTS},
    db,
    error::{is_unique_violation, AppError, AppResult},
    models::{ParticipantInfo, ParticipantRole, TodoItem, TripCard, TripStatus},
    services::mailer::spawn_trip_creation_email,
    utils::{AuthUser, Config, OptionalAuthUser},
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreatorInfo {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub description: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub status: TripStatus,
    pub creator: CreatorInfo,
    pub participant_count: i64,
    pub is_participant: bool,
    pub created_at: DateTime<Utc>,
}

impl TripResponse {
    fn from_card(card: TripCard, is_participant: bool) -> Self {
        Self {
            id: card.id,
            destination: card.destination,
            start_date: card.start_date,
            end_date: card.end_date,
            budget: card.budget,
            description: card.description,
            is_public: card.is_public,
            max_participants: card.max_participants,
            status: card.status,
            creator: CreatorInfo {
                id: card.creator_id,
                name: card.creator_name,
                avatar: card.creator_avatar,
            },
            participant_count: card.participant_count,
            is_participant,
            created_at: card.created_at,
        }
    }
}

pub async fn list_trips(
    OptionalAuthUser(claims): OptionalAuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let trips = db::trips::list_public_trips(&pool).await?;

    let my_trip_ids: HashSet<Uuid> = match &claims {
        Some(claims) => db::trips::trip_ids_for_user(&pool, claims.sub)
            .await?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let trips: Vec<TripResponse> = trips
        .into_iter()
        .map(|card| {
            let joined = my_trip_ids.contains(&card.id);
            TripResponse::from_card(card, joined)
        })
        .collect();

    Ok(Json(json!({ "trips": trips })))
}

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub destination: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub budget: Option<f64>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub max_participants: Option<i32>,
}

pub async fn create_trip(
    AuthUser(claims): AuthUser,
    State((pool, config)): State<(PgPool, Config)>,
    Json(req): Json<CreateTripRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let (destination, start_date, end_date, budget) =
        match (req.destination, req.start_date, req.end_date, req.budget) {
            (Some(dest), Some(start), Some(end), Some(budget)) if !dest.trim().is_empty() => {
                (dest, start, end, budget)
            }
            _ => return Err(AppError::validation("Missing required fields")),
        };

    let max_participants = req.max_participants.unwrap_or(DEFAULT_TRIP_PARTICIPANTS);
    if !is_valid_trip_capacity(max_participants) {
        return Err(AppError::validation(
            "Max participants must be between 2 and 20",
        ));
    }

    let description = req.description.unwrap_or_default();

    let trip = db::trips::create_trip(
        &pool,
        claims.sub,
        destination.trim(),
        start_date,
        end_date,
        budget,
        &description,
        req.is_public.unwrap_or(true),
        max_participants,
    )
    .await?;

    db::trips::add_participant(&pool, claims.sub, trip.id, ParticipantRole::Creator)
        .await
        .map_err(AppError::Database)?;

    // Notification is best-effort; the trip is already committed
    if let Some(creator) = db::users::get_user_by_id(&pool, claims.sub).await? {
        spawn_trip_creation_email(&config, creator.email, creator.name, trip.description.clone());
    }

    Ok(Json(json!({ "trip": { "id": trip.id } })))
}

#[derive(Debug, Serialize)]
pub struct TripDetailResponse {
    pub id: Uuid,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub description: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub status: TripStatus,
    pub creator: CreatorInfo,
    pub participants: Vec<ParticipantInfo>,
    pub todo_items: Vec<TodoItem>,
    pub created_at: DateTime<Utc>,
}

pub async fn get_trip(
    Path(trip_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<TripDetailResponse>> {
    let trip = db::trips::get_trip(&pool, trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    let creator = db::users::get_user_by_id(&pool, trip.creator_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    let participants = db::trips::list_participants(&pool, trip_id).await?;
    let todo_items = db::trips::list_todos(&pool, trip_id).await?;

    Ok(Json(TripDetailResponse {
        id: trip.id,
        destination: trip.destination,
        start_date: trip.start_date,
        end_date: trip.end_date,
        budget: trip.budget,
        description: trip.description,
        is_public: trip.is_public,
        max_participants: trip.max_participants,
        status: trip.status,
        creator: CreatorInfo {
            id: creator.id,
            name: creator.name,
            avatar: creator.avatar,
        },
        participants,
        todo_items,
        created_at: trip.created_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct TodoStats {
    pub completed: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct MyTripResponse {
    #[serde(flatten)]
    pub trip: TripResponse,
    pub participants: Vec<ParticipantInfo>,
    pub user_role: ParticipantRole,
    pub is_creator: bool,
    pub progress: i64,
    pub todo_stats: TodoStats,
}

pub async fn my_trips(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let cards = db::trips::list_trips_for_user(&pool, claims.sub).await?;

    let mut trips = Vec::with_capacity(cards.len());
    for card in cards {
        let participants = db::trips::list_participants(&pool, card.id).await?;
        let (completed, total) = db::trips::todo_stats(&pool, card.id).await?;

        let user_role = participants
            .iter()
            .find(|p| p.id == claims.sub)
            .map(|p| p.role)
            .unwrap_or(ParticipantRole::Participant);

        let is_creator = card.creator_id == claims.sub;
        let progress = if total > 0 {
            (completed * 100 + total / 2) / total
        } else {
            0
        };

        trips.push(MyTripResponse {
            trip: TripResponse::from_card(card, true),
            participants,
            user_role,
            is_creator,
            progress,
            todo_stats: TodoStats { completed, total },
        });
    }

    let now = Utc::now();
    let created: Vec<Uuid> = trips.iter().filter(|t| t.is_creator).map(|t| t.trip.id).collect();
    let joined: Vec<Uuid> = trips.iter().filter(|t| !t.is_creator).map(|t| t.trip.id).collect();
    let upcoming: Vec<Uuid> = trips
        .iter()
        .filter(|t| t.trip.start_date > now)
        .map(|t| t.trip.id)
        .collect();
    let ongoing: Vec<Uuid> = trips
        .iter()
        .filter(|t| t.trip.start_date <= now && t.trip.end_date >= now)
        .map(|t| t.trip.id)
        .collect();
    let completed: Vec<Uuid> = trips
        .iter()
        .filter(|t| t.trip.end_date < now)
        .map(|t| t.trip.id)
        .collect();

    Ok(Json(json!({
        "trips": trips,
        "stats": {
            "total": trips.len(),
            "created": created.len(),
            "joined": joined.len(),
            "upcoming": upcoming.len(),
            "ongoing": ongoing.len(),
            "completed": completed.len(),
        },
        "categories": {
            "created": created,
            "joined": joined,
            "upcoming": upcoming,
            "ongoing": ongoing,
            "completed": completed,
        },
    })))
}

pub async fn join_trip(
    AuthUser(claims): AuthUser,
    Path(trip_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let trip = db::trips::get_trip(&pool, trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    if !trip.is_public {
        return Err(AppError::forbidden("Trip is not public"));
    }

    if db::trips::participant_count(&pool, trip_id).await? >= trip.max_participants as i64 {
        return Err(AppError::validation("Trip is full"));
    }

    if db::trips::get_participant(&pool, claims.sub, trip_id)
        .await?
        .is_some()
    {
        return Err(AppError::validation("Already a participant"));
    }

    db::trips::add_participant(&pool, claims.sub, trip_id, ParticipantRole::Participant)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::validation("Already a participant")
            } else {
                AppError::Database(e)
            }
        })?;

    Ok(Json(json!({ "message": "Successfully joined trip" })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn update_status(
    AuthUser(claims): AuthUser,
    Path(trip_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let status: TripStatus = req
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::validation("Invalid status"))?;

    let trip = db::trips::get_trip(&pool, trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    if trip.creator_id != claims.sub {
        return Err(AppError::forbidden("Only the creator can update trip status"));
    }

    let updated = db::trips::update_status(&pool, trip_id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    Ok(Json(json!({
        "success": true,
        "trip": { "id": updated.id, "status": updated.status },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("OPEN".parse::<TripStatus>(), Ok(TripStatus::Open));
        assert_eq!("ONGOING".parse::<TripStatus>(), Ok(TripStatus::Ongoing));
        assert_eq!("ENDED".parse::<TripStatus>(), Ok(TripStatus::Ended));
        assert!("open".parse::<TripStatus>().is_err());
        assert!("CANCELLED".parse::<TripStatus>().is_err());
    }

    #[test]
    fn test_capacity_bounds() {
        assert!(is_valid_trip_capacity(2));
        assert!(is_valid_trip_capacity(20));
        assert!(!is_valid_trip_capacity(1));
        assert!(!is_valid_trip_capacity(21));
    }
}
