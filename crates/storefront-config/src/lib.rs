//! # Storefront Config
//!
//! Configuration types for the Storefront API.
//!
//! Every struct is loaded from environment variables through `from_env()`
//! and falls back to a development-friendly default when a variable is
//! missing or does not parse:
//!
//! - [`app`]: Environment, bind address, password hashing cost
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: Connection string and pool size
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`rate_limit`]: Per-IP rate limiting
//!
//! # Example
//!
//! ```ignore
//! use storefront_config::{AppConfig, JwtConfig, CorsConfig, RateLimitConfig};
//!
//! let app_config = AppConfig::from_env();
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod app;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;

// Re-export commonly used types at crate root
pub use app::{AppConfig, Environment};
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;

/// Reads and parses an environment variable, `None` when unset or invalid.
pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
