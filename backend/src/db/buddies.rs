use crate::models::{BuddyProfile, BuddyRequest, MatchCandidate, PendingRequestRow, RequestStatus};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

const REQUEST_COLUMNS: &str = "id, requester_id, receiver_id, status, created_at, updated_at";

pub async fn create_request(
    pool: &PgPool,
    requester_id: Uuid,
    receiver_id: Uuid,
) -> Result<BuddyRequest, sqlx::Error> {
    sqlx::query_as::<_, BuddyRequest>(&format!(
        "INSERT INTO buddy_requests (requester_id, receiver_id) VALUES ($1, $2) \
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(requester_id)
    .bind(receiver_id)
    .fetch_one(pool)
    .await
}

pub async fn get_request(pool: &PgPool, request_id: Uuid) -> Result<Option<BuddyRequest>> {
    let request = sqlx::query_as::<_, BuddyRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM buddy_requests WHERE id = $1"
    ))
    .bind(request_id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

pub async fn get_request_by_pair(
    pool: &PgPool,
    requester_id: Uuid,
    receiver_id: Uuid,
) -> Result<Option<BuddyRequest>> {
    let request = sqlx::query_as::<_, BuddyRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM buddy_requests \
         WHERE requester_id = $1 AND receiver_id = $2"
    ))
    .bind(requester_id)
    .bind(receiver_id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

pub async fn update_request_status(
    pool: &PgPool,
    request_id: Uuid,
    status: RequestStatus,
) -> Result<BuddyRequest> {
    let request = sqlx::query_as::<_, BuddyRequest>(&format!(
        "UPDATE buddy_requests SET status = $2, updated_at = NOW() WHERE id = $1 \
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(request_id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

pub async fn delete_request(pool: &PgPool, request_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM buddy_requests WHERE id = $1")
        .bind(request_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Ids of users connected to `user_id` through an ACCEPTED edge, whichever
/// side of the edge they sit on.
pub async fn accepted_buddy_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT CASE WHEN requester_id = $1 THEN receiver_id ELSE requester_id END
        FROM buddy_requests
        WHERE status = 'ACCEPTED' AND (requester_id = $1 OR receiver_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

const PROFILE_SELECT: &str = r#"
    SELECT u.id, u.name, u.avatar, u.location, u.bio, u.interests,
           (SELECT COUNT(*) FROM trips t WHERE t.creator_id = u.id) AS trips_completed
    FROM users u
"#;

/// Accepted buddies with their profiles, deduped by counterpart id.
pub async fn accepted_buddy_profiles(pool: &PgPool, user_id: Uuid) -> Result<Vec<BuddyProfile>> {
    let buddies = sqlx::query_as::<_, BuddyProfile>(&format!(
        r#"{PROFILE_SELECT}
        WHERE u.id IN (
            SELECT CASE WHEN requester_id = $1 THEN receiver_id ELSE requester_id END
            FROM buddy_requests
            WHERE status = 'ACCEPTED' AND (requester_id = $1 OR receiver_id = $1)
        )
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(buddies)
}

/// Customer directory excluding the viewer, searchable by name or interests.
pub async fn directory(
    pool: &PgPool,
    viewer: Option<Uuid>,
    search: Option<&str>,
    limit: i64,
) -> Result<Vec<BuddyProfile>> {
    let users = sqlx::query_as::<_, BuddyProfile>(&format!(
        r#"{PROFILE_SELECT}
        WHERE u.user_type = 'CUSTOMER'
          AND ($1::uuid IS NULL OR u.id <> $1)
          AND ($2::text IS NULL
               OR u.name ILIKE '%' || $2 || '%'
               OR u.interests ILIKE '%' || $2 || '%')
        LIMIT $3
        "#
    ))
    .bind(viewer)
    .bind(search)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Incoming (`received = true`) or outgoing PENDING requests with the
/// counterpart's profile, newest first.
pub async fn pending_requests(
    pool: &PgPool,
    user_id: Uuid,
    received: bool,
) -> Result<Vec<PendingRequestRow>> {
    let (filter_column, other_column) = if received {
        ("receiver_id", "requester_id")
    } else {
        ("requester_id", "receiver_id")
    };

    let requests = sqlx::query_as::<_, PendingRequestRow>(&format!(
        r#"
        SELECT r.id, r.status, r.created_at,
               u.id AS user_id, u.name AS user_name, u.avatar AS user_avatar,
               u.location AS user_location, u.bio AS user_bio, u.interests AS user_interests,
               (SELECT COUNT(*) FROM trips t WHERE t.creator_id = u.id) AS trips_completed
        FROM buddy_requests r
        JOIN users u ON u.id = r.{other_column}
        WHERE r.{filter_column} = $1 AND r.status = 'PENDING'
        ORDER BY r.created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Accepted buddies with the identity fields the chat screen needs.
pub async fn accepted_chat_buddies(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<crate::models::chats::ChatBuddy>> {
    let buddies = sqlx::query_as::<_, crate::models::chats::ChatBuddy>(
        r#"
        SELECT u.id, u.name, u.email, u.avatar
        FROM users u
        WHERE u.id IN (
            SELECT CASE WHEN requester_id = $1 THEN receiver_id ELSE requester_id END
            FROM buddy_requests
            WHERE status = 'ACCEPTED' AND (requester_id = $1 OR receiver_id = $1)
        )
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(buddies)
}

/// Every blog id the user liked or wishlisted (union).
pub async fn interest_blog_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT blog_id FROM likes WHERE user_id = $1 \
         UNION SELECT blog_id FROM wishlists WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Matchmaking candidates: every customer except the viewer and their
/// existing accepted buddies, each with the union of their liked and
/// wishlisted blog ids.
pub async fn match_candidates(
    pool: &PgPool,
    viewer: Uuid,
    excluded: &[Uuid],
) -> Result<Vec<MatchCandidate>> {
    let candidates = sqlx::query_as::<_, MatchCandidate>(
        r#"
        SELECT u.id, u.name, u.avatar, u.interests,
               (SELECT COUNT(*) FROM trips t WHERE t.creator_id = u.id) AS trips_completed,
               COALESCE(
                   (SELECT array_agg(DISTINCT s.blog_id)
                    FROM (SELECT blog_id FROM likes WHERE user_id = u.id
                          UNION SELECT blog_id FROM wishlists WHERE user_id = u.id) s),
                   ARRAY[]::uuid[]) AS blog_ids
        FROM users u
        WHERE u.user_type = 'CUSTOMER'
          AND u.id <> $1
          AND u.id <> ALL($2)
        "#,
    )
    .bind(viewer)
    .bind(excluded)
    .fetch_all(pool)
    .await?;

    Ok(candidates)
}
