use crate::models::{BuddyReview, TripReview};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent on (trip_id, reviewer_id): a second submission overwrites the
/// rating and comment instead of creating a duplicate.
pub async fn upsert_trip_review(
    pool: &PgPool,
    trip_id: Uuid,
    reviewer_id: Uuid,
    rating: i32,
    comment: Option<&str>,
) -> Result<TripReview> {
    let review = sqlx::query_as::<_, TripReview>(
        r#"
        INSERT INTO trip_reviews (trip_id, reviewer_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (trip_id, reviewer_id)
        DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, updated_at = NOW()
        RETURNING id, trip_id, reviewer_id, rating, comment, created_at, updated_at
        "#,
    )
    .bind(trip_id)
    .bind(reviewer_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await?;

    Ok(review)
}

/// Idempotent on (trip_id, reviewer_id, buddy_id).
pub async fn upsert_buddy_review(
    pool: &PgPool,
    trip_id: Uuid,
    reviewer_id: Uuid,
    buddy_id: Uuid,
    rating: i32,
    comment: Option<&str>,
) -> Result<BuddyReview> {
    let review = sqlx::query_as::<_, BuddyReview>(
        r#"
        INSERT INTO buddy_reviews (trip_id, reviewer_id, buddy_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (trip_id, reviewer_id, buddy_id)
        DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, updated_at = NOW()
        RETURNING id, trip_id, reviewer_id, buddy_id, rating, comment, created_at, updated_at
        "#,
    )
    .bind(trip_id)
    .bind(reviewer_id)
    .bind(buddy_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await?;

    Ok(review)
}
