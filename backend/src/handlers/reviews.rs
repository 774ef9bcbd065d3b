use crate::{
    constants::is_valid_rating,
    db,
    error::{AppError, AppResult},
    utils::{AuthUser, Config},
};
use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub trip_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub review_type: Option<String>,
    pub comment: Option<String>,
    pub reviewed_user_id: Option<Uuid>,
}

/// Upsert keyed by (trip, reviewer) for TRIP reviews and (trip, reviewer,
/// buddy) for BUDDY reviews: re-submission overwrites rating and comment.
pub async fn create_review(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let (trip_id, rating, review_type) = match (req.trip_id, req.rating, req.review_type) {
        (Some(t), Some(r), Some(kind)) => (t, r, kind),
        _ => {
            return Err(AppError::validation(
                "Trip ID, rating, and review type are required",
            ))
        }
    };

    if !is_valid_rating(rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }

    if db::trips::get_trip(&pool, trip_id).await?.is_none() {
        return Err(AppError::not_found("Trip not found"));
    }

    if db::trips::get_participant(&pool, claims.sub, trip_id)
        .await?
        .is_none()
    {
        return Err(AppError::forbidden(
            "You can only review trips you participated in",
        ));
    }

    let comment = req
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    match review_type.as_str() {
        "TRIP" => {
            let review =
                db::reviews::upsert_trip_review(&pool, trip_id, claims.sub, rating, comment)
                    .await?;

            Ok(Json(json!({ "ok": true, "review": review })))
        }
        "BUDDY" => {
            let buddy_id = req
                .reviewed_user_id
                .ok_or_else(|| AppError::validation("Missing reviewed_user_id"))?;

            if db::trips::get_participant(&pool, buddy_id, trip_id)
                .await?
                .is_none()
            {
                return Err(AppError::forbidden(
                    "You can only review users who participated in the same trip",
                ));
            }

            let review = db::reviews::upsert_buddy_review(
                &pool, trip_id, claims.sub, buddy_id, rating, comment,
            )
            .await?;

            Ok(Json(json!({ "ok": true, "review": review })))
        }
        _ => Err(AppError::validation("Invalid review type")),
    }
}
