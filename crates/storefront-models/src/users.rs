//! User domain models and DTOs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::{PageRequest, SortOrder};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::validation::trimmed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as returned by the API. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored user together with its password hash, for credential checks.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Insert payload handed to the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Fields to overwrite on update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(
        length(min = 3, max = 30, message = "username must be between 3 and 30 characters"),
        custom(
            function = "crate::validation::alphanumeric",
            message = "username must only contain alpha-numeric characters"
        )
    )]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(email(message = "email must be a valid email"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: String,
    /// Defaults to `user`
    pub role: Option<UserRole>,
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(
        length(min = 3, max = 30, message = "username must be between 3 and 30 characters"),
        custom(
            function = "crate::validation::alphanumeric",
            message = "username must only contain alpha-numeric characters"
        )
    )]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email"))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Whitelisted sort columns for user lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UserSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Username,
    Email,
    Role,
}

impl UserSortField {
    pub fn column(&self) -> &'static str {
        match self {
            UserSortField::CreatedAt => "created_at",
            UserSortField::UpdatedAt => "updated_at",
            UserSortField::Username => "username",
            UserSortField::Email => "email",
            UserSortField::Role => "role",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Page number, starting at 1
    #[validate(range(min = 1, message = "page must be greater than or equal to 1"))]
    pub page: Option<u64>,
    /// Page size, 1 to 100
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u64>,
    pub sort: Option<UserSortField>,
    pub order: Option<SortOrder>,
    /// Case-insensitive match on username or email
    #[validate(length(max = 100, message = "search must be at most 100 characters"))]
    pub search: Option<String>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
}

/// Normalized list criteria handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort: UserSortField,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl Default for UserFilter {
    fn default() -> Self {
        UserListQuery::default().into()
    }
}

impl From<UserListQuery> for UserFilter {
    fn from(query: UserListQuery) -> Self {
        Self {
            search: trimmed(query.search.as_deref()),
            is_active: Some(query.is_active.unwrap_or(true)),
            sort: query.sort.unwrap_or_default(),
            order: query.order.unwrap_or_default(),
            page: PageRequest::new(query.page, query.limit),
        }
    }
}
