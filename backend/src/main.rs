use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tripmate::{get_db_pool, handlers, utils, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let db_config = tripmate::db::DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    // Run migrations
    tripmate::db::migrations::run_migrations(&pool).await?;

    let port = config.port;
    let app = create_router(pool, config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(pool: PgPool, config: Config) -> Router {
    let cors_layer = create_cors_layer(&config);
    let app_state = (pool, config);

    Router::new()
        .route("/health", get(health_check))
        // Auth
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/signin", post(handlers::auth::signin))
        .route("/api/auth/logout", post(handlers::auth::logout))
        // Blogs, likes, wishlist
        .route(
            "/api/blogs",
            get(handlers::blogs::list_blogs).post(handlers::blogs::create_blog),
        )
        .route("/api/blogs/{id}", get(handlers::blogs::get_blog))
        .route("/api/blogs/{id}/like", post(handlers::blogs::toggle_like))
        .route(
            "/api/blogs/{id}/wishlist",
            post(handlers::blogs::toggle_wishlist),
        )
        .route("/api/wishlist", get(handlers::blogs::list_wishlist))
        // Trips and todos
        .route(
            "/api/trips",
            get(handlers::trips::list_trips).post(handlers::trips::create_trip),
        )
        .route("/api/trips/my", get(handlers::trips::my_trips))
        .route("/api/trips/{id}", get(handlers::trips::get_trip))
        .route("/api/trips/{id}/join", post(handlers::trips::join_trip))
        .route("/api/trips/{id}/status", patch(handlers::trips::update_status))
        .route("/api/trips/{id}/todos", post(handlers::todos::create_todo))
        .route(
            "/api/todos/{id}",
            patch(handlers::todos::update_todo).delete(handlers::todos::delete_todo),
        )
        // Buddies
        .route("/api/buddies", get(handlers::buddies::directory))
        .route(
            "/api/buddies/matchmaking",
            get(handlers::buddies::matchmaking),
        )
        .route(
            "/api/buddies/requests",
            get(handlers::buddies::my_buddies).post(handlers::buddies::create_request),
        )
        .route(
            "/api/buddies/requests/pending",
            get(handlers::buddies::pending_requests),
        )
        .route(
            "/api/buddies/requests/{id}",
            patch(handlers::buddies::update_request).delete(handlers::buddies::cancel_request),
        )
        // Chats
        .route(
            "/api/chats",
            get(handlers::chats::list_chats).post(handlers::chats::create_chat),
        )
        .route(
            "/api/chats/{id}/messages",
            get(handlers::chats::list_messages).post(handlers::chats::send_message),
        )
        .route("/api/chat-buddies", get(handlers::chats::chat_buddies))
        // Premium community groups
        .route(
            "/api/groups",
            get(handlers::groups::list_groups).post(handlers::groups::create_group),
        )
        .route("/api/groups/{id}", get(handlers::groups::get_group))
        .route(
            "/api/groups/{id}/posts",
            get(handlers::groups::list_posts).post(handlers::groups::create_post),
        )
        // Reviews
        .route("/api/reviews", post(handlers::reviews::create_review))
        // Profile
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route(
            "/api/profile/password",
            patch(handlers::profile::change_password),
        )
        .route("/api/profile/trips", get(handlers::profile::completed_trips))
        // Admin
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/{id}",
            patch(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        // External collaborators
        .route(
            "/api/destinations/random",
            get(handlers::destinations::random_destination),
        )
        .route("/api/hotels/search", get(handlers::hotels::search_hotels))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            utils::auth::require_auth_on_protected_paths,
        ))
        .layer(cors_layer)
        .with_state(app_state)
}

fn create_cors_layer(_config: &Config) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    // Check if ALLOWED_ORIGINS environment variable is set for multiple domains
    if let Ok(cors_origins) = std::env::var("ALLOWED_ORIGINS") {
        let origins: Vec<HeaderValue> = cors_origins
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                if !trimmed.is_empty() {
                    trimmed.parse().ok()
                } else {
                    None
                }
            })
            .collect();

        if !origins.is_empty() {
            cors = cors.allow_origin(origins);
        } else {
            // Fallback to permissive if parsing fails
            cors = cors.allow_origin(Any);
        }
    } else {
        // Default to permissive for development
        cors = cors.allow_origin(Any);
    }

    cors
}

async fn health_check() -> &'static str {
    "OK"
}
