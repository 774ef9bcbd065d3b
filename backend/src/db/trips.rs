use crate::models::{
    CompletedTripRow, ParticipantInfo, ParticipantRole, TodoItem, Trip, TripCard, TripParticipant,
    TripStatus,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const TRIP_COLUMNS: &str = "id, destination, start_date, end_date, budget, description, \
                            is_public, max_participants, status, creator_id, created_at";

const TRIP_CARD_SELECT: &str = r#"
    SELECT t.id, t.destination, t.start_date, t.end_date, t.budget, t.description,
           t.is_public, t.max_participants, t.status, t.creator_id, t.created_at,
           u.name AS creator_name,
           u.avatar AS creator_avatar,
           (SELECT COUNT(*) FROM trip_participants p WHERE p.trip_id = t.id) AS participant_count
    FROM trips t
    JOIN users u ON u.id = t.creator_id
"#;

#[allow(clippy::too_many_arguments)]
pub async fn create_trip(
    pool: &PgPool,
    creator_id: Uuid,
    destination: &str,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    budget: f64,
    description: &str,
    is_public: bool,
    max_participants: i32,
) -> Result<Trip> {
    let trip = sqlx::query_as::<_, Trip>(&format!(
        r#"
        INSERT INTO trips (destination, start_date, end_date, budget, description,
                           is_public, max_participants, creator_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {TRIP_COLUMNS}
        "#
    ))
    .bind(destination)
    .bind(start_date)
    .bind(end_date)
    .bind(budget)
    .bind(description)
    .bind(is_public)
    .bind(max_participants)
    .bind(creator_id)
    .fetch_one(pool)
    .await?;

    Ok(trip)
}

pub async fn get_trip(pool: &PgPool, trip_id: Uuid) -> Result<Option<Trip>> {
    let trip = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1"
    ))
    .bind(trip_id)
    .fetch_optional(pool)
    .await?;

    Ok(trip)
}

pub async fn list_public_trips(pool: &PgPool) -> Result<Vec<TripCard>> {
    let trips = sqlx::query_as::<_, TripCard>(&format!(
        "{TRIP_CARD_SELECT} WHERE t.is_public ORDER BY t.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(trips)
}

/// Trips the user belongs to, either side of the creator/participant split.
pub async fn list_trips_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<TripCard>> {
    let trips = sqlx::query_as::<_, TripCard>(&format!(
        r#"{TRIP_CARD_SELECT}
        WHERE EXISTS(SELECT 1 FROM trip_participants p
                     WHERE p.trip_id = t.id AND p.user_id = $1)
        ORDER BY t.created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(trips)
}

pub async fn update_status(
    pool: &PgPool,
    trip_id: Uuid,
    status: TripStatus,
) -> Result<Option<Trip>> {
    let trip = sqlx::query_as::<_, Trip>(&format!(
        "UPDATE trips SET status = $2 WHERE id = $1 RETURNING {TRIP_COLUMNS}"
    ))
    .bind(trip_id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(trip)
}

// Participants

pub async fn add_participant(
    pool: &PgPool,
    user_id: Uuid,
    trip_id: Uuid,
    role: ParticipantRole,
) -> Result<TripParticipant, sqlx::Error> {
    sqlx::query_as::<_, TripParticipant>(
        r#"
        INSERT INTO trip_participants (user_id, trip_id, role)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, trip_id, role, joined_at
        "#,
    )
    .bind(user_id)
    .bind(trip_id)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn get_participant(
    pool: &PgPool,
    user_id: Uuid,
    trip_id: Uuid,
) -> Result<Option<TripParticipant>> {
    let participant = sqlx::query_as::<_, TripParticipant>(
        "SELECT id, user_id, trip_id, role, joined_at FROM trip_participants \
         WHERE user_id = $1 AND trip_id = $2",
    )
    .bind(user_id)
    .bind(trip_id)
    .fetch_optional(pool)
    .await?;

    Ok(participant)
}

/// Ids of every trip the user participates in, for cheap membership checks
/// across a listing.
pub async fn trip_ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let ids =
        sqlx::query_scalar::<_, Uuid>("SELECT trip_id FROM trip_participants WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(ids)
}

pub async fn participant_count(pool: &PgPool, trip_id: Uuid) -> Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trip_participants WHERE trip_id = $1")
            .bind(trip_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub async fn list_participants(pool: &PgPool, trip_id: Uuid) -> Result<Vec<ParticipantInfo>> {
    let participants = sqlx::query_as::<_, ParticipantInfo>(
        r#"
        SELECT u.id, u.name, u.avatar, p.role, p.joined_at
        FROM trip_participants p
        JOIN users u ON u.id = p.user_id
        WHERE p.trip_id = $1
        ORDER BY p.joined_at ASC
        "#,
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await?;

    Ok(participants)
}

// Todo items

pub async fn create_todo(
    pool: &PgPool,
    trip_id: Uuid,
    created_by: Uuid,
    text: &str,
) -> Result<TodoItem> {
    let todo = sqlx::query_as::<_, TodoItem>(
        r#"
        INSERT INTO todo_items (text, trip_id, created_by)
        VALUES ($1, $2, $3)
        RETURNING id, text, completed, trip_id, created_by, created_at
        "#,
    )
    .bind(text)
    .bind(trip_id)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(todo)
}

pub async fn get_todo(pool: &PgPool, todo_id: Uuid) -> Result<Option<TodoItem>> {
    let todo = sqlx::query_as::<_, TodoItem>(
        "SELECT id, text, completed, trip_id, created_by, created_at \
         FROM todo_items WHERE id = $1",
    )
    .bind(todo_id)
    .fetch_optional(pool)
    .await?;

    Ok(todo)
}

pub async fn list_todos(pool: &PgPool, trip_id: Uuid) -> Result<Vec<TodoItem>> {
    let todos = sqlx::query_as::<_, TodoItem>(
        "SELECT id, text, completed, trip_id, created_by, created_at \
         FROM todo_items WHERE trip_id = $1 ORDER BY created_at ASC",
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await?;

    Ok(todos)
}

pub async fn update_todo(
    pool: &PgPool,
    todo_id: Uuid,
    text: Option<&str>,
    completed: Option<bool>,
) -> Result<TodoItem> {
    let todo = sqlx::query_as::<_, TodoItem>(
        r#"
        UPDATE todo_items
        SET text = COALESCE($2, text),
            completed = COALESCE($3, completed)
        WHERE id = $1
        RETURNING id, text, completed, trip_id, created_by, created_at
        "#,
    )
    .bind(todo_id)
    .bind(text)
    .bind(completed)
    .fetch_one(pool)
    .await?;

    Ok(todo)
}

pub async fn delete_todo(pool: &PgPool, todo_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM todo_items WHERE id = $1")
        .bind(todo_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// (completed, total) todo counts for one trip.
pub async fn todo_stats(pool: &PgPool, trip_id: Uuid) -> Result<(i64, i64)> {
    let row = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*) \
         FROM todo_items WHERE trip_id = $1",
    )
    .bind(trip_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Trips whose end date has passed, with the user's own trip review (if any).
pub async fn list_completed_trips(pool: &PgPool, user_id: Uuid) -> Result<Vec<CompletedTripRow>> {
    let trips = sqlx::query_as::<_, CompletedTripRow>(
        r#"
        SELECT t.id, t.destination, t.end_date, r.rating
        FROM trips t
        JOIN trip_participants p ON p.trip_id = t.id AND p.user_id = $1
        LEFT JOIN trip_reviews r ON r.trip_id = t.id AND r.reviewer_id = $1
        WHERE t.end_date < NOW()
        ORDER BY t.end_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(trips)
}
