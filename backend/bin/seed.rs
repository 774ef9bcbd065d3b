use anyhow::Result;
use clap::{Arg, Command};
use sqlx::PgPool;
use tracing::{info, warn};
use tripmate::db::{get_db_pool, DatabaseConfig};
use tripmate::utils::auth::hash_password;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let matches = Command::new("seed")
        .about("Seed the database with demo users, blogs, and trips")
        .arg(
            Arg::new("wipe")
                .long("wipe")
                .help("Delete existing content before seeding")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let wipe = matches.get_flag("wipe");

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    info!("Connected to database");

    tripmate::db::migrations::run_migrations(&pool).await?;

    if wipe {
        warn!("🧹 Wiping existing content...");
        // users cascades through everything else
        sqlx::query("DELETE FROM users").execute(&pool).await?;
    }

    let blog_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs")
        .fetch_one(&pool)
        .await?;
    if blog_count > 0 {
        info!("Database already has content. Re-run with --wipe to reseed.");
        return Ok(());
    }

    info!("🌱 Seeding demo data...");

    let admin = upsert_user(&pool, "Admin", "admin@tripmate.dev", "admin123", "ADMIN", false).await?;
    let mina = upsert_user(&pool, "Mina Rahman", "mina@example.com", "password123", "CUSTOMER", false).await?;
    let arif = upsert_user(&pool, "Arif Hossain", "arif@example.com", "password123", "CUSTOMER", true).await?;
    let tania = upsert_user(&pool, "Tania Akter", "tania@example.com", "password123", "CUSTOMER", true).await?;
    info!("👤 Created 4 users (admin {})", admin);

    sqlx::query("UPDATE users SET interests = $2 WHERE id = $1")
        .bind(mina)
        .bind("hiking, street food, photography")
        .execute(&pool)
        .await?;
    sqlx::query("UPDATE users SET interests = $2 WHERE id = $1")
        .bind(arif)
        .bind("beaches, diving, photography")
        .execute(&pool)
        .await?;

    let bali = create_blog(
        &pool,
        mina,
        "Amazing Journey Through Bali",
        "Bali, the Island of the Gods, offers an incredible blend of natural beauty, \
         rich culture, and spiritual experiences. Start in Ubud among the rice terraces, \
         then head to Seminyak for the legendary sunsets.",
        Some("Bali, Indonesia"),
    )
    .await?;
    let tokyo = create_blog(
        &pool,
        arif,
        "Tokyo Street Food Adventure",
        "Tokyo's street food scene is unparalleled. From tiny ramen shops to bustling \
         food markets, every corner offers a new culinary adventure. Start at the \
         Tsukiji Outer Market and work outward.",
        Some("Tokyo, Japan"),
    )
    .await?;
    info!("📝 Created 2 blogs");

    // Overlapping likes/wishlists so matchmaking has signal
    like(&pool, mina, tokyo).await?;
    like(&pool, arif, bali).await?;
    like(&pool, tania, bali).await?;
    wishlist(&pool, tania, tokyo).await?;
    wishlist(&pool, mina, bali).await?;

    let trip = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO trips (destination, start_date, end_date, budget, description,
                           max_participants, creator_id)
        VALUES ('Bali, Indonesia', NOW() + INTERVAL '30 days', NOW() + INTERVAL '37 days',
                1200, 'Temples, rice terraces, and beaches. Pack light.', 4, $1)
        RETURNING id
        "#,
    )
    .bind(mina)
    .fetch_one(&pool)
    .await?;

    sqlx::query(
        "INSERT INTO trip_participants (user_id, trip_id, role) VALUES ($1, $2, 'CREATOR')",
    )
    .bind(mina)
    .bind(trip)
    .execute(&pool)
    .await?;
    sqlx::query(
        "INSERT INTO trip_participants (user_id, trip_id, role) VALUES ($1, $2, 'PARTICIPANT')",
    )
    .bind(arif)
    .bind(trip)
    .execute(&pool)
    .await?;

    for text in ["Book flights", "Renew passports", "Reserve Ubud homestay"] {
        sqlx::query("INSERT INTO todo_items (text, trip_id, created_by) VALUES ($1, $2, $3)")
            .bind(text)
            .bind(trip)
            .bind(mina)
            .execute(&pool)
            .await?;
    }
    info!("🧳 Created 1 trip with 2 participants and 3 todos");

    sqlx::query("INSERT INTO buddy_requests (requester_id, receiver_id) VALUES ($1, $2)")
        .bind(tania)
        .bind(mina)
        .execute(&pool)
        .await?;
    sqlx::query(
        "INSERT INTO buddy_requests (requester_id, receiver_id, status) \
         VALUES ($1, $2, 'ACCEPTED')",
    )
    .bind(mina)
    .bind(arif)
    .execute(&pool)
    .await?;
    info!("👫 Created buddy requests (1 pending, 1 accepted)");

    info!("🎉 Seeding complete!");

    Ok(())
}

async fn upsert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    user_type: &str,
    is_premium: bool,
) -> Result<Uuid> {
    let password_hash = hash_password(password)?;

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (name, email, password, user_type, is_premium)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(user_type)
    .bind(is_premium)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn create_blog(
    pool: &PgPool,
    author: Uuid,
    title: &str,
    content: &str,
    location: Option<&str>,
) -> Result<Uuid> {
    let preview: String = content.chars().take(200).collect();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO blogs (title, content, preview, location, author_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(title)
    .bind(content)
    .bind(preview)
    .bind(location)
    .bind(author)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn like(pool: &PgPool, user: Uuid, blog: Uuid) -> Result<()> {
    sqlx::query("INSERT INTO likes (user_id, blog_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user)
        .bind(blog)
        .execute(pool)
        .await?;
    Ok(())
}

async fn wishlist(pool: &PgPool, user: Uuid, blog: Uuid) -> Result<()> {
    sqlx::query("INSERT INTO wishlists (user_id, blog_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user)
        .bind(blog)
        .execute(pool)
        .await?;
    Ok(())
}
