use crate::{
    constants::{AUTH_COOKIE_NAME, BCRYPT_COST, PROTECTED_PATH_PREFIXES, TOKEN_TTL_DAYS},
    error::AppError,
    models::{User, UserType},
    utils::Config,
};
use anyhow::Result;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Signed token payload; `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub user_type: UserType,
    pub is_premium: bool,
    pub exp: i64,
}

pub fn mint_token(secret: &str, user: &User) -> Result<String> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        user_type: user.user_type,
        is_premium: user.is_premium,
        exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Bearer header first, `auth-token` cookie as the browser fallback.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, AUTH_COOKIE_NAME))
        .map(|token| token.to_string())
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then_some(value)
    })
}

/// Set-Cookie value issued alongside the token on signup/signin.
pub fn auth_cookie(token: &str) -> String {
    let max_age = Duration::days(TOKEN_TTL_DAYS).num_seconds();
    format!("{AUTH_COOKIE_NAME}={token}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=Lax")
}

/// Expired cookie sent on logout.
pub fn clear_auth_cookie() -> String {
    format!("{AUTH_COOKIE_NAME}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

pub fn is_protected_path(path: &str) -> bool {
    PROTECTED_PATH_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

/// Gateway gate mirroring the path-prefix allowlist: protected prefixes are
/// rejected before the handler runs when no valid token is attached.
pub async fn require_auth_on_protected_paths(
    State((_pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Response {
    if is_protected_path(request.uri().path()) {
        let verified = extract_token(request.headers())
            .and_then(|token| verify_token(&config.jwt_secret, &token).ok());

        if verified.is_none() {
            return AppError::unauthorized("Not authenticated").into_response();
        }
    }

    next.run(request).await
}

/// Required identity: rejects with 401 when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<(PgPool, Config)> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &(PgPool, Config),
    ) -> Result<Self, Self::Rejection> {
        let (_, config) = state;

        let token = extract_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        let claims = verify_token(&config.jwt_secret, &token)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(claims))
    }
}

/// Optional identity for endpoints that serve anonymous callers too; a bad
/// token degrades to anonymous rather than failing the request.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<Claims>);

impl FromRequestParts<(PgPool, Config)> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &(PgPool, Config),
    ) -> Result<Self, Self::Rejection> {
        let (_, config) = state;

        let claims = extract_token(&parts.headers)
            .and_then(|token| verify_token(&config.jwt_secret, &token).ok());

        Ok(OptionalAuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(extract_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_fallback() {
        let headers = headers_with(header::COOKIE, "theme=dark; auth-token=xyz789");
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz789"));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = headers_with(header::AUTHORIZATION, "Bearer from-header");
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("auth-token=from-cookie"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(extract_token(&HeaderMap::new()), None);

        let headers = headers_with(header::AUTHORIZATION, "Basic dXNlcg==");
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_protected_path_matching() {
        assert!(is_protected_path("/api/profile"));
        assert!(is_protected_path("/api/profile/password"));
        assert!(is_protected_path("/api/admin/users"));

        // Prefix matching is per segment, not per character
        assert!(!is_protected_path("/api/profiles"));
        assert!(!is_protected_path("/api/blogs"));
        assert!(!is_protected_path("/health"));
    }

    #[test]
    fn test_password_roundtrip() {
        // Low-cost hash to keep the test fast
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }
}
