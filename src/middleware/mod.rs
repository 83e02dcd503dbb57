//! Middleware and extractors for cross-cutting request concerns.
//!
//! # Modules
//!
//! - [`auth`]: Bearer token authentication (`AuthUser`, `OptionalAuthUser`)
//! - [`role`]: Role-based authorization gates
//! - [`errors`]: The terminal error sink
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::authenticate`] verifies the token and re-loads the user
//! 3. [`role::require_admin`] checks the role of the resolved identity
//! 4. Handler executes with `AuthUser` available as an extractor
//!
//! # Example
//!
//! ```ignore
//! use axum::middleware::{from_fn, from_fn_with_state};
//!
//! let admin_routes = Router::new()
//!     .route("/", post(create_product))
//!     .route_layer(from_fn(require_admin))
//!     .route_layer(from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod errors;
pub mod role;
