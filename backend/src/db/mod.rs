pub mod blogs;
pub mod buddies;
pub mod chats;
pub mod connection;
pub mod groups;
pub mod migrations;
pub mod reviews;
pub mod trips;
pub mod users;

pub use connection::{get_db_pool, DatabaseConfig};
