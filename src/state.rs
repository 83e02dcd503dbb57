use std::fmt;
use std::sync::Arc;

use storefront_config::{AppConfig, CorsConfig, JwtConfig, RateLimitConfig};
use storefront_db::{PgPool, PgProductStore, PgUserStore, ProductStore, UserStore};

/// Shared state handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub app_config: AppConfig,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("app_config", &self.app_config)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .finish_non_exhaustive()
    }
}

pub fn init_app_state(pool: PgPool, app_config: AppConfig) -> AppState {
    AppState {
        users: Arc::new(PgUserStore::new(pool.clone())),
        products: Arc::new(PgProductStore::new(pool)),
        app_config,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    }
}

#[cfg(feature = "test-utils")]
impl AppState {
    /// State backed by the in-memory stores, with cheap hashing and no rate limit.
    pub fn in_memory() -> Self {
        use storefront_config::Environment;
        use storefront_config::app::MIN_BCRYPT_COST;
        use storefront_db::{MemoryProductStore, MemoryUserStore};

        Self {
            users: Arc::new(MemoryUserStore::new()),
            products: Arc::new(MemoryProductStore::new()),
            app_config: AppConfig {
                environment: Environment::Test,
                bcrypt_cost: MIN_BCRYPT_COST,
                seed_on_startup: false,
                ..AppConfig::default()
            },
            jwt_config: JwtConfig {
                secret: "test-secret-key".to_string(),
                access_token_expiry: 3600,
            },
            cors_config: CorsConfig::default(),
            rate_limit_config: RateLimitConfig::disabled(),
        }
    }
}
