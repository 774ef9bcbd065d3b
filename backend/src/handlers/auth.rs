use crate::{
    db,
    error::{is_unique_violation, AppError, AppResult},
    models::SafeUser,
    utils::{
        auth::{auth_cookie, clear_auth_cookie, hash_password, mint_token, verify_password},
        Config,
    },
};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: SafeUser,
    pub token: String,
    pub success: bool,
}

pub async fn signup(
    State((pool, config)): State<(PgPool, Config)>,
    Json(req): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let (name, email, password) = match (req.name, req.email, req.password) {
        (Some(n), Some(e), Some(p)) if !n.trim().is_empty() && !p.is_empty() => (n, e, p),
        _ => {
            return Err(AppError::validation(
                "Name, email, and password are required",
            ))
        }
    };

    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::validation("Invalid email address"));
    }

    if db::users::get_user_by_email(&pool, &email).await?.is_some() {
        return Err(AppError::validation("User already exists with this email"));
    }

    let password_hash = hash_password(&password)?;

    let user = db::users::create_user(&pool, name.trim(), &email, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::validation("User already exists with this email")
            } else {
                AppError::Database(e)
            }
        })?;

    let token = mint_token(&config.jwt_secret, &user)?;

    Ok((
        [(header::SET_COOKIE, auth_cookie(&token))],
        Json(AuthResponse {
            user: user.into(),
            token,
            success: true,
        }),
    ))
}

pub async fn signin(
    State((pool, config)): State<(PgPool, Config)>,
    Json(req): Json<SigninRequest>,
) -> AppResult<impl IntoResponse> {
    let (email, password) = match (req.email, req.password) {
        (Some(e), Some(p)) => (e, p),
        _ => return Err(AppError::validation("Email and password are required")),
    };

    let user = db::users::get_user_by_email(&pool, email.trim().to_lowercase().as_str()).await?;

    let user = match user {
        Some(user) if verify_password(&password, &user.password) => user,
        _ => return Err(AppError::unauthorized("Invalid email or password")),
    };

    let token = mint_token(&config.jwt_secret, &user)?;

    Ok((
        [(header::SET_COOKIE, auth_cookie(&token))],
        Json(AuthResponse {
            user: user.into(),
            token,
            success: true,
        }),
    ))
}

pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_auth_cookie())],
        Json(json!({ "success": true, "message": "Logged out" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(EMAIL_RE.is_match("traveler@example.com"));
        assert!(EMAIL_RE.is_match("a.b+c@sub.domain.org"));
        assert!(!EMAIL_RE.is_match("not-an-email"));
        assert!(!EMAIL_RE.is_match("two@@example.com"));
        assert!(!EMAIL_RE.is_match("spaces in@example.com"));
    }
}
