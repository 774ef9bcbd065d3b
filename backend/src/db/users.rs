use crate::models::{AdminUserRow, SafeUser, User};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password, phone, interests, avatar, location, bio, \
                            user_type, is_premium, created_at, updated_at";

const SAFE_USER_COLUMNS: &str = "id, name, email, phone, interests, avatar, location, bio, \
                                 user_type, is_premium, created_at";

pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
    ))
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    name: Option<&str>,
    phone: Option<&str>,
    interests: Option<&str>,
    location: Option<&str>,
    bio: Option<&str>,
) -> Result<Option<SafeUser>> {
    let user = sqlx::query_as::<_, SafeUser>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            interests = COALESCE($4, interests),
            location = COALESCE($5, location),
            bio = COALESCE($6, bio),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {SAFE_USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(name)
    .bind(phone)
    .bind(interests)
    .bind(location)
    .bind(bio)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<()> {
    sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn set_premium(
    pool: &PgPool,
    user_id: Uuid,
    is_premium: bool,
) -> Result<Option<SafeUser>> {
    let user = sqlx::query_as::<_, SafeUser>(&format!(
        "UPDATE users SET is_premium = $2, updated_at = NOW() WHERE id = $1 \
         RETURNING {SAFE_USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(is_premium)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Customer listing for the admin dashboard, optionally filtered by a
/// name/email substring and a premium flag.
pub async fn list_customers(
    pool: &PgPool,
    search: Option<&str>,
    premium: Option<bool>,
) -> Result<Vec<AdminUserRow>> {
    let users = sqlx::query_as::<_, AdminUserRow>(
        r#"
        SELECT u.id, u.name, u.email, u.is_premium, u.created_at,
               (SELECT COUNT(*) FROM trips t WHERE t.creator_id = u.id) AS trips_completed
        FROM users u
        WHERE u.user_type = 'CUSTOMER'
          AND ($1::text IS NULL OR u.name ILIKE '%' || $1 || '%' OR u.email ILIKE '%' || $1 || '%')
          AND ($2::boolean IS NULL OR u.is_premium = $2)
        ORDER BY u.created_at DESC
        "#,
    )
    .bind(search)
    .bind(premium)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
