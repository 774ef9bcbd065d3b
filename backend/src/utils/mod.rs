pub mod auth;
pub mod config;
pub mod logging;
pub mod matching;

pub use auth::{AuthUser, OptionalAuthUser};
pub use config::Config;
pub use logging::init_logging;
