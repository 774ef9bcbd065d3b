use crate::models::{Group, GroupPost, GroupPostWithAuthor, GroupSummary};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const GROUP_COLUMNS: &str = "id, name, creator_id, created_at, updated_at";

const GROUP_SUMMARY_SELECT: &str = r#"
    SELECT g.id, g.name, g.creator_id,
           u.name AS creator_name,
           u.avatar AS creator_avatar,
           (SELECT COUNT(*) FROM group_posts p WHERE p.group_id = g.id) AS post_count,
           g.created_at, g.updated_at
    FROM groups g
    JOIN users u ON u.id = g.creator_id
"#;

pub async fn list_groups(pool: &PgPool) -> Result<Vec<GroupSummary>> {
    let groups = sqlx::query_as::<_, GroupSummary>(&format!(
        "{GROUP_SUMMARY_SELECT} ORDER BY g.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(groups)
}

pub async fn get_group(pool: &PgPool, group_id: Uuid) -> Result<Option<Group>> {
    let group = sqlx::query_as::<_, Group>(&format!(
        "SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1"
    ))
    .bind(group_id)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

pub async fn get_group_summary(pool: &PgPool, group_id: Uuid) -> Result<Option<GroupSummary>> {
    let group = sqlx::query_as::<_, GroupSummary>(&format!(
        "{GROUP_SUMMARY_SELECT} WHERE g.id = $1"
    ))
    .bind(group_id)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

pub async fn get_group_by_name(pool: &PgPool, name: &str) -> Result<Option<Group>> {
    let group = sqlx::query_as::<_, Group>(&format!(
        "SELECT {GROUP_COLUMNS} FROM groups WHERE name = $1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

pub async fn create_group(
    pool: &PgPool,
    name: &str,
    creator_id: Uuid,
) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>(&format!(
        "INSERT INTO groups (name, creator_id) VALUES ($1, $2) RETURNING {GROUP_COLUMNS}"
    ))
    .bind(name)
    .bind(creator_id)
    .fetch_one(pool)
    .await
}

pub async fn list_posts(pool: &PgPool, group_id: Uuid) -> Result<Vec<GroupPostWithAuthor>> {
    let posts = sqlx::query_as::<_, GroupPostWithAuthor>(
        r#"
        SELECT p.id, p.title, p.content, p.location, p.post_date,
               u.id AS author_id, u.name AS author_name, u.avatar AS author_avatar,
               p.created_at
        FROM group_posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.group_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

pub async fn create_post(
    pool: &PgPool,
    group_id: Uuid,
    author_id: Uuid,
    title: &str,
    content: &str,
    location: Option<&str>,
    post_date: DateTime<Utc>,
) -> Result<GroupPost> {
    let post = sqlx::query_as::<_, GroupPost>(
        r#"
        INSERT INTO group_posts (group_id, author_id, title, content, location, post_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, group_id, author_id, title, content, location, post_date, created_at
        "#,
    )
    .bind(group_id)
    .bind(author_id)
    .bind(title)
    .bind(content)
    .bind(location)
    .bind(post_date)
    .fetch_one(pool)
    .await?;

    Ok(post)
}
