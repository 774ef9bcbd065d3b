// =============================================================================
// Tripmate Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// AUTH
// =============================================================================

/// How long issued auth tokens stay valid
pub const TOKEN_TTL_DAYS: i64 = 7;

/// bcrypt work factor for stored password hashes
pub const BCRYPT_COST: u32 = 12;

/// Cookie carrying the auth token for browser navigation
pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// Path prefixes that require a valid token before the handler runs
pub const PROTECTED_PATH_PREFIXES: &[&str] = &[
    "/api/wishlist",
    "/api/chats",
    "/api/chat-buddies",
    "/api/profile",
    "/api/reviews",
    "/api/admin",
];

// =============================================================================
// TRIPS
// =============================================================================

/// Smallest allowed trip capacity
pub const MIN_TRIP_PARTICIPANTS: i32 = 2;

/// Largest allowed trip capacity
pub const MAX_TRIP_PARTICIPANTS: i32 = 20;

/// Capacity used when the creator does not specify one
pub const DEFAULT_TRIP_PARTICIPANTS: i32 = 6;

// =============================================================================
// BLOGS
// =============================================================================

/// Character limit for the derived blog preview
pub const BLOG_PREVIEW_CHAR_LIMIT: usize = 200;

// =============================================================================
// BUDDIES
// =============================================================================

/// Maximum users returned by the buddy directory search
pub const BUDDY_DIRECTORY_LIMIT: i64 = 20;

// =============================================================================
// CHATS
// =============================================================================

/// Maximum messages returned per poll
pub const MESSAGE_PAGE_LIMIT: i64 = 200;

// =============================================================================
// REVIEWS
// =============================================================================

/// Valid rating range (inclusive)
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// =============================================================================
// EXTERNAL APIS
// =============================================================================

/// TripAdvisor RapidAPI host for hotel search
pub const HOTEL_API_BASE_URL: &str = "https://tripadvisor16.p.rapidapi.com/api/v1/hotels";

/// Generative AI endpoint for the destination suggestion
pub const DESTINATION_API_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Timeout for all outbound third-party calls
pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// HELPER FUNCTIONS FOR VALIDATION
// =============================================================================

/// Validates a requested trip capacity
pub fn is_valid_trip_capacity(n: i32) -> bool {
    (MIN_TRIP_PARTICIPANTS..=MAX_TRIP_PARTICIPANTS).contains(&n)
}

/// Validates a review rating
pub fn is_valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
