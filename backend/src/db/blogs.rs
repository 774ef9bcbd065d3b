use crate::models::{Blog, BlogCard, WishlistEntry};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const BLOG_CARD_SELECT: &str = r#"
    SELECT b.id, b.title, b.content, b.preview, b.location, b.tags, b.images,
           b.publish_date,
           u.name AS author_name,
           (SELECT COUNT(*) FROM likes l WHERE l.blog_id = b.id) AS like_count,
           EXISTS(SELECT 1 FROM likes l WHERE l.blog_id = b.id AND l.user_id = $1::uuid) AS is_liked,
           EXISTS(SELECT 1 FROM wishlists w WHERE w.blog_id = b.id AND w.user_id = $1::uuid) AS is_wishlisted
    FROM blogs b
    JOIN users u ON u.id = b.author_id
"#;

/// Blog listing with caller-dependent flags; `viewer` may be anonymous.
pub async fn list_blogs(
    pool: &PgPool,
    viewer: Option<Uuid>,
    search: Option<&str>,
) -> Result<Vec<BlogCard>> {
    let blogs = sqlx::query_as::<_, BlogCard>(&format!(
        r#"{BLOG_CARD_SELECT}
        WHERE ($2::text IS NULL
               OR b.title ILIKE '%' || $2 || '%'
               OR b.preview ILIKE '%' || $2 || '%'
               OR b.location ILIKE '%' || $2 || '%')
        ORDER BY b.publish_date DESC
        "#
    ))
    .bind(viewer)
    .bind(search)
    .fetch_all(pool)
    .await?;

    Ok(blogs)
}

pub async fn get_blog_card(
    pool: &PgPool,
    blog_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<BlogCard>> {
    let blog = sqlx::query_as::<_, BlogCard>(&format!("{BLOG_CARD_SELECT} WHERE b.id = $2"))
        .bind(viewer)
        .bind(blog_id)
        .fetch_optional(pool)
        .await?;

    Ok(blog)
}

pub async fn create_blog(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    content: &str,
    preview: &str,
    location: Option<&str>,
    publish_date: DateTime<Utc>,
) -> Result<Blog> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (title, content, preview, location, publish_date, author_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, content, preview, location, tags, images, is_premium,
                  publish_date, author_id, created_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(preview)
    .bind(location)
    .bind(publish_date)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(blog)
}

pub async fn blog_exists(pool: &PgPool, blog_id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM blogs WHERE id = $1)")
        .bind(blog_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Like toggle; returns the caller's new state and the fresh count.
pub async fn toggle_like(pool: &PgPool, user_id: Uuid, blog_id: Uuid) -> Result<(bool, i64)> {
    let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND blog_id = $2")
        .bind(user_id)
        .bind(blog_id)
        .execute(pool)
        .await?
        .rows_affected();

    let is_liked = if removed == 0 {
        sqlx::query("INSERT INTO likes (user_id, blog_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(blog_id)
            .execute(pool)
            .await?;
        true
    } else {
        false
    };

    let like_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE blog_id = $1")
            .bind(blog_id)
            .fetch_one(pool)
            .await?;

    Ok((is_liked, like_count))
}

pub async fn toggle_wishlist(pool: &PgPool, user_id: Uuid, blog_id: Uuid) -> Result<bool> {
    let removed = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND blog_id = $2")
        .bind(user_id)
        .bind(blog_id)
        .execute(pool)
        .await?
        .rows_affected();

    if removed > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT INTO wishlists (user_id, blog_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .bind(blog_id)
        .execute(pool)
        .await?;

    Ok(true)
}

pub async fn list_wishlist(pool: &PgPool, user_id: Uuid) -> Result<Vec<WishlistEntry>> {
    let entries = sqlx::query_as::<_, WishlistEntry>(
        r#"
        SELECT b.id, b.title, b.preview, b.location, b.images, b.publish_date, w.added_at
        FROM wishlists w
        JOIN blogs b ON b.id = w.blog_id
        WHERE w.user_id = $1
        ORDER BY w.added_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
