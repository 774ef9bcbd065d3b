use crate::{
    constants::BUDDY_DIRECTORY_LIMIT,
    db,
    error::{is_unique_violation, AppError, AppResult},
    models::{BuddyProfile, PendingRequestRow, RequestStatus},
    utils::{
        matching::{parse_interests, rank_candidates, BuddyMatch},
        AuthUser, Config, OptionalAuthUser,
    },
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
pub struct BuddyCard {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub location: String,
    pub trips_completed: i64,
    pub interests: Vec<String>,
}

impl From<BuddyProfile> for BuddyCard {
    fn from(profile: BuddyProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            avatar: profile
                .avatar
                .unwrap_or_else(|| "/placeholder.svg".to_string()),
            location: profile
                .location
                .unwrap_or_else(|| "Location not set".to_string()),
            trips_completed: profile.trips_completed,
            interests: parse_interests(profile.interests.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub search: Option<String>,
}

pub async fn directory(
    OptionalAuthUser(claims): OptionalAuthUser,
    Query(query): Query<DirectoryQuery>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<BuddyCard>>> {
    let viewer = claims.map(|c| c.sub);
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let users = db::buddies::directory(&pool, viewer, search, BUDDY_DIRECTORY_LIMIT).await?;

    Ok(Json(users.into_iter().map(BuddyCard::from).collect()))
}

/// Pairwise shared-interest scan over liked/wishlisted blogs (ranked by
/// overlap, zero-overlap candidates never appear).
pub async fn matchmaking(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<BuddyMatch>>> {
    let own_blog_ids: HashSet<Uuid> = db::buddies::interest_blog_ids(&pool, claims.sub)
        .await?
        .into_iter()
        .collect();

    // No interest signal, no suggestions
    if own_blog_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let excluded = db::buddies::accepted_buddy_ids(&pool, claims.sub).await?;
    let candidates = db::buddies::match_candidates(&pool, claims.sub, &excluded).await?;

    Ok(Json(rank_candidates(&own_blog_ids, candidates)))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub receiver_id: Option<Uuid>,
}

pub async fn create_request(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<Json<serde_json::Value>> {
    let receiver_id = body
        .receiver_id
        .ok_or_else(|| AppError::validation("Receiver ID is required"))?;

    if receiver_id == claims.sub {
        return Err(AppError::validation("Cannot send buddy request to yourself"));
    }

    if db::users::get_user_by_id(&pool, receiver_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    if db::buddies::get_request_by_pair(&pool, claims.sub, receiver_id)
        .await?
        .is_some()
    {
        return Err(AppError::validation("Buddy request already sent"));
    }

    let request = db::buddies::create_request(&pool, claims.sub, receiver_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::validation("Buddy request already sent")
            } else {
                AppError::Database(e)
            }
        })?;

    Ok(Json(json!(request)))
}

/// Accepted buddies, both directions, deduped by counterpart id in the query.
pub async fn my_buddies(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<BuddyCard>>> {
    let buddies = db::buddies::accepted_buddy_profiles(&pool, claims.sub).await?;

    Ok(Json(buddies.into_iter().map(BuddyCard::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct PendingRequestUser {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub location: String,
    pub bio: String,
    pub trips_completed: i64,
    pub interests: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PendingRequestView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub direction: &'static str,
    pub user: PendingRequestUser,
    pub created_at: DateTime<Utc>,
    pub status: RequestStatus,
}

fn format_pending(row: PendingRequestRow, direction: &'static str) -> PendingRequestView {
    PendingRequestView {
        id: row.id,
        direction,
        user: PendingRequestUser {
            id: row.user_id,
            name: row.user_name,
            avatar: row
                .user_avatar
                .unwrap_or_else(|| "/placeholder.svg".to_string()),
            location: row
                .user_location
                .unwrap_or_else(|| "Location not specified".to_string()),
            bio: row
                .user_bio
                .unwrap_or_else(|| "No bio available".to_string()),
            trips_completed: row.trips_completed,
            interests: parse_interests(row.user_interests.as_deref()),
        },
        created_at: row.created_at,
        status: row.status,
    }
}

pub async fn pending_requests(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let incoming: Vec<PendingRequestView> = db::buddies::pending_requests(&pool, claims.sub, true)
        .await?
        .into_iter()
        .map(|row| format_pending(row, "incoming"))
        .collect();

    let outgoing: Vec<PendingRequestView> = db::buddies::pending_requests(&pool, claims.sub, false)
        .await?
        .into_iter()
        .map(|row| format_pending(row, "outgoing"))
        .collect();

    Ok(Json(json!({
        "success": true,
        "incoming_count": incoming.len(),
        "outgoing_count": outgoing.len(),
        "incoming": incoming,
        "outgoing": outgoing,
    })))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Accept,
    Decline,
    Cancel,
}

impl std::str::FromStr for RequestAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            "cancel" => Ok(Self::Cancel),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequestBody {
    pub action: Option<String>,
}

/// PENDING -> ACCEPTED/REJECTED is receiver-driven, PENDING -> deleted is
/// requester-driven; anything else is a conflict.
pub async fn update_request(
    AuthUser(claims): AuthUser,
    Path(request_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(body): Json<UpdateRequestBody>,
) -> AppResult<Json<serde_json::Value>> {
    let action: RequestAction = body
        .action
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            AppError::validation("Invalid action. Must be 'accept', 'decline', or 'cancel'")
        })?;

    let request = db::buddies::get_request(&pool, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("Buddy request not found"))?;

    match action {
        RequestAction::Cancel => {
            if request.requester_id != claims.sub {
                return Err(AppError::forbidden("You can only cancel requests you sent"));
            }
            if request.status != RequestStatus::Pending {
                return Err(AppError::conflict(
                    "Cannot cancel a request that has already been processed",
                ));
            }

            db::buddies::delete_request(&pool, request_id).await?;

            Ok(Json(json!({
                "success": true,
                "message": "Buddy request canceled successfully",
            })))
        }
        RequestAction::Accept | RequestAction::Decline => {
            if request.receiver_id != claims.sub {
                return Err(AppError::forbidden(
                    "You can only accept/decline requests sent to you",
                ));
            }
            if request.status != RequestStatus::Pending {
                return Err(AppError::conflict("Request has already been processed"));
            }

            let new_status = match action {
                RequestAction::Accept => RequestStatus::Accepted,
                _ => RequestStatus::Rejected,
            };

            let updated = db::buddies::update_request_status(&pool, request_id, new_status).await?;

            Ok(Json(json!({ "success": true, "request": updated })))
        }
    }
}

pub async fn cancel_request(
    AuthUser(claims): AuthUser,
    Path(request_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<serde_json::Value>> {
    let request = db::buddies::get_request(&pool, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("Buddy request not found"))?;

    if request.requester_id != claims.sub {
        return Err(AppError::forbidden("You can only cancel requests you sent"));
    }

    if request.status != RequestStatus::Pending {
        return Err(AppError::conflict(
            "Cannot cancel a request that has already been processed",
        ));
    }

    db::buddies::delete_request(&pool, request_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Buddy request canceled successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!("accept".parse::<RequestAction>(), Ok(RequestAction::Accept));
        assert_eq!(
            "decline".parse::<RequestAction>(),
            Ok(RequestAction::Decline)
        );
        assert_eq!("cancel".parse::<RequestAction>(), Ok(RequestAction::Cancel));
        assert!("Accept".parse::<RequestAction>().is_err());
        assert!("block".parse::<RequestAction>().is_err());
    }
}
