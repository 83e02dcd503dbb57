//! Role-based authorization.
//!
//! These gates only read the identity that [`authenticate`] attached to the
//! request, so they must be layered inside it:
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/", post(create_user))
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(state, authenticate));
//! ```
//!
//! [`authenticate`]: crate::middleware::auth::authenticate

use anyhow::anyhow;
use axum::{extract::Request, middleware::Next, response::Response};
use storefront_core::AppError;
use storefront_models::UserRole;

use crate::middleware::auth::AuthUser;

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const INSUFFICIENT_PERMISSIONS: &str = "Access denied. Insufficient permissions.";

/// Checks the attached identity against `allowed_roles`.
///
/// # Errors
///
/// 401 when no identity is attached, 403 when its role is not allowed.
pub fn check_roles(user: Option<&AuthUser>, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let user = user.ok_or_else(|| AppError::unauthorized(anyhow!(AUTHENTICATION_REQUIRED)))?;

    if !allowed_roles.contains(&user.role) {
        return Err(AppError::forbidden(
            anyhow!("role {} is not one of {:?}", user.role, allowed_roles)
                .context(INSUFFICIENT_PERMISSIONS),
        ));
    }

    Ok(())
}

pub async fn require_roles(
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    check_roles(req.extensions().get::<AuthUser>(), allowed_roles)?;
    Ok(next.run(req).await)
}

/// Admin-only routes.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(req, next, &[UserRole::Admin]).await
}
