use crate::{
    constants::BLOG_PREVIEW_CHAR_LIMIT,
    db,
    error::{AppError, AppResult},
    models::BlogCard,
    utils::{AuthUser, Config, OptionalAuthUser},
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub location: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub publish_date: DateTime<Utc>,
    pub author: String,
    pub likes: i64,
    pub is_liked: bool,
    pub is_wishlisted: bool,
}

#[derive(Debug, Serialize)]
pub struct BlogDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub preview: String,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub publish_date: DateTime<Utc>,
    pub author: String,
    pub likes: i64,
    pub is_liked: bool,
    pub is_wishlisted: bool,
}

impl From<BlogCard> for BlogResponse {
    fn from(card: BlogCard) -> Self {
        Self {
            id: card.id,
            title: card.title,
            preview: card.preview,
            location: card.location,
            tags: card.tags,
            images: card.images,
            publish_date: card.publish_date,
            author: card.author_name,
            likes: card.like_count,
            is_liked: card.is_liked,
            is_wishlisted: card.is_wishlisted,
        }
    }
}

impl From<BlogCard> for BlogDetailResponse {
    fn from(card: BlogCard) -> Self {
        Self {
            id: card.id,
            title: card.title,
            content: card.content,
            preview: card.preview,
            location: card.location,
            tags: card.tags,
            images: card.images,
            publish_date: card.publish_date,
            author: card.author_name,
            likes: card.like_count,
            is_liked: card.is_liked,
            is_wishlisted: card.is_wishlisted,
        }
    }
}

/// First part of the content as the listing teaser.
fn make_preview(content: &str) -> String {
    if content.chars().count() > BLOG_PREVIEW_CHAR_LIMIT {
        let cut: String = content.chars().take(BLOG_PREVIEW_CHAR_LIMIT).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}

pub async fn list_blogs(
    OptionalAuthUser(claims): OptionalAuthUser,
    Query(query): Query<BlogQuery>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<BlogResponse>>> {
    let viewer = claims.map(|c| c.sub);
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let blogs = db::blogs::list_blogs(&pool, viewer, search).await?;

    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

pub async fn create_blog(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreateBlogRequest>,
) -> AppResult<Json<BlogDetailResponse>> {
    let (title, content) = match (req.title, req.content) {
        (Some(t), Some(c)) if !t.trim().is_empty() && !c.trim().is_empty() => (t, c),
        _ => return Err(AppError::validation("Title and content are required")),
    };

    let content = content.trim().to_string();
    let preview = make_preview(&content);
    let location = req.location.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let publish_date = req.publish_date.unwrap_or_else(Utc::now);

    let blog = db::blogs::create_blog(
        &pool,
        claims.sub,
        title.trim(),
        &content,
        &preview,
        location,
        publish_date,
    )
    .await?;

    let card = db::blogs::get_blog_card(&pool, blog.id, Some(claims.sub))
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    Ok(Json(card.into()))
}

pub async fn get_blog(
    OptionalAuthUser(claims): OptionalAuthUser,
    Path(blog_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<BlogDetailResponse>> {
    let viewer = claims.map(|c| c.sub);

    let card = db::blogs::get_blog_card(&pool, blog_id, viewer)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    Ok(Json(card.into()))
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub is_liked: bool,
    pub likes: i64,
}

pub async fn toggle_like(
    AuthUser(claims): AuthUser,
    Path(blog_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<LikeResponse>> {
    if !db::blogs::blog_exists(&pool, blog_id).await? {
        return Err(AppError::not_found("Blog not found"));
    }

    let (is_liked, likes) = db::blogs::toggle_like(&pool, claims.sub, blog_id).await?;

    Ok(Json(LikeResponse { is_liked, likes }))
}

#[derive(Debug, Serialize)]
pub struct WishlistToggleResponse {
    pub is_wishlisted: bool,
}

pub async fn toggle_wishlist(
    AuthUser(claims): AuthUser,
    Path(blog_id): Path<Uuid>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<WishlistToggleResponse>> {
    if !db::blogs::blog_exists(&pool, blog_id).await? {
        return Err(AppError::not_found("Blog not found"));
    }

    let is_wishlisted = db::blogs::toggle_wishlist(&pool, claims.sub, blog_id).await?;

    Ok(Json(WishlistToggleResponse { is_wishlisted }))
}

#[derive(Debug, Serialize)]
pub struct WishlistItemResponse {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub location: Option<String>,
    pub images: Vec<String>,
    pub added_date: DateTime<Utc>,
}

pub async fn list_wishlist(
    AuthUser(claims): AuthUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> AppResult<Json<Vec<WishlistItemResponse>>> {
    let entries = db::blogs::list_wishlist(&pool, claims.sub).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|entry| WishlistItemResponse {
                id: entry.id,
                title: entry.title,
                preview: entry.preview,
                location: entry.location,
                images: entry.images,
                added_date: entry.added_at,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_kept_whole() {
        assert_eq!(make_preview("a short post"), "a short post");
    }

    #[test]
    fn test_long_content_truncated_with_ellipsis() {
        let content = "x".repeat(BLOG_PREVIEW_CHAR_LIMIT + 50);
        let preview = make_preview(&content);
        assert_eq!(preview.chars().count(), BLOG_PREVIEW_CHAR_LIMIT + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let content = "é".repeat(BLOG_PREVIEW_CHAR_LIMIT + 1);
        let preview = make_preview(&content);
        assert!(preview.ends_with("..."));
    }
}
