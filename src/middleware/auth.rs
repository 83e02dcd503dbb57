use std::convert::Infallible;

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use storefront_auth::{INVALID_TOKEN, verify_token};
use storefront_core::AppError;
use storefront_models::{User, UserRole};
use uuid::Uuid;

use crate::state::AppState;

pub const NO_TOKEN: &str = "Access denied. No token provided.";
pub const USER_NOT_FOUND_OR_INACTIVE: &str = "Invalid token. User not found or inactive.";

/// The identity behind a verified token, re-loaded from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Runs the full check: header, signature and expiry, then an active account.
async fn resolve(parts: &mut Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::unauthorized(anyhow!("{}", rejection).context(NO_TOKEN)))?;

    let claims = verify_token(bearer.token(), &state.jwt_config)?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| AppError::unauthorized(anyhow!(INVALID_TOKEN)))?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| AppError::unauthorized(anyhow!(USER_NOT_FOUND_OR_INACTIVE)))?;

    Ok(AuthUser::from(user))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by `authenticate`
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let user = resolve(parts, state).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Like [`AuthUser`] but never rejects: any failure yields `None`.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// Middleware that rejects unauthenticated requests and stores the
/// resolved [`AuthUser`] in the request extensions for later gates.
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    AuthUser::from_request_parts(&mut parts, &state).await?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}
