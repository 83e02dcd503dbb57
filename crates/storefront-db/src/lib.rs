//! # Storefront DB
//!
//! Persistence for users and products.
//!
//! Handlers never talk to a database directly. They go through the
//! [`UserStore`] and [`ProductStore`] traits, held as trait objects in the
//! application state:
//!
//! - [`postgres`]: the production implementation on a `sqlx` pool
//! - [`memory`] (feature `memory`): lock-guarded maps used by the test suites
//!
//! Uniqueness (usernames, emails, product names) is enforced by the store
//! itself. A write that collides surfaces as a 409 [`AppError`](storefront_core::AppError).
//!
//! # Example
//!
//! ```ignore
//! use storefront_config::DatabaseConfig;
//! use storefront_db::{init_db_pool, run_migrations, PgUserStore};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserStore::new(pool.clone());
//! ```

pub mod errors;
#[cfg(feature = "memory")]
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use storefront_config::DatabaseConfig;

pub use errors::{PRODUCT_CONFLICT, USER_CONFLICT};
#[cfg(feature = "memory")]
pub use memory::{MemoryProductStore, MemoryUserStore};
pub use postgres::{PgProductStore, PgUserStore};
pub use seed::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, SeedReport, sample_products,
    seed_defaults,
};
pub use store::{ProductStore, UserStore};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens the connection pool. Call once at startup and share the pool.
///
/// # Errors
///
/// Fails if the database is unreachable within the acquire timeout.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
