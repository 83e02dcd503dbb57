//! Process-level settings: runtime environment, bind address and bcrypt cost.
//!
//! - `APP_ENV`: `development` (default), `production` or `test`
//! - `HOST`: bind host (default `0.0.0.0`)
//! - `PORT`: bind port (default `5000`)
//! - `BCRYPT_COST`: bcrypt work factor (default `12`, valid range 4..=31)
//! - `SEED_ON_STARTUP`: seed the default admin and sample products at boot
//!   (default `true` outside production)

use std::fmt;
use std::str::FromStr;

use crate::env_parse;

pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub seed_on_startup: bool,
    /// Reported by the health endpoint.
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: "0.0.0.0".to_string(),
            port: 5000,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            seed_on_startup: true,
            version: "1.0.0".to_string(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let environment = match std::env::var("APP_ENV") {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!("{}, falling back to development", err);
                Environment::Development
            }),
            Err(_) => Environment::Development,
        };

        Self {
            environment,
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT").unwrap_or(defaults.port),
            bcrypt_cost: env_parse::<u32>("BCRYPT_COST")
                .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
                .unwrap_or(defaults.bcrypt_cost),
            seed_on_startup: env_parse("SEED_ON_STARTUP")
                .unwrap_or(environment != Environment::Production),
            version: defaults.version,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
