//! # Storefront Auth
//!
//! Access token claims and the functions that issue and verify them.
//!
//! Tokens are HS256 JWTs signed with the secret from
//! [`JwtConfig`](storefront_config::JwtConfig). They carry enough identity
//! to address the user, but the HTTP layer still re-resolves the account
//! from the store on every request so deactivated users lose access at once.
//!
//! # Example
//!
//! ```ignore
//! use storefront_auth::{create_access_token, verify_token};
//! use storefront_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "alice", "alice@example.com", "user", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.username, "alice");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{INVALID_TOKEN, create_access_token, verify_token};
