use axum::extract::State;
use storefront_core::{ApiResponse, AppError, Created, MessageResponse, PaginationInfo};
use storefront_models::{
    CreateUserDto, LoginRequest, LoginResponse, UpdateUserDto, User, UserFilter, UserListQuery,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{ResourceId, ValidatedJson, ValidatedQuery};

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation failed", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let response = UserService::login(
        state.users.as_ref(),
        dto,
        &state.jwt_config,
        state.app_config.bcrypt_cost,
    )
    .await?;
    Ok(ApiResponse::with_data("Login successful", response))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "User profile", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), auth_user.id).await?;
    Ok(ApiResponse::with_data("User profile retrieved successfully", user))
}

/// Create a new user (admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<User>),
        (status = 400, description = "Validation failed", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden", body = MessageResponse),
        (status = 409, description = "Username or email already taken", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Created<User>, AppError> {
    let user =
        UserService::create_user(state.users.as_ref(), dto, state.app_config.bcrypt_cost).await?;
    Ok(Created(ApiResponse::with_data("User created successfully", user)))
}

/// List users with pagination, sorting and search (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<User>>),
        (status = 400, description = "Invalid query", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserListQuery>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let filter = UserFilter::from(query);
    let page = UserService::get_users(state.users.as_ref(), &filter).await?;
    let pagination = PaginationInfo::for_request(filter.page, page.total);

    Ok(ApiResponse::paginated(
        "Users retrieved successfully",
        page.items,
        pagination,
    ))
}

/// Get a user by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<User>),
        (status = 400, description = "Invalid ID format", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), id).await?;
    Ok(ApiResponse::with_data("User retrieved successfully", user))
}

/// Update a user; absent fields are left unchanged (admin only)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<User>),
        (status = 400, description = "Validation failed", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 409, description = "Username or email already taken", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<ApiResponse<User>, AppError> {
    let user =
        UserService::update_user(state.users.as_ref(), id, dto, state.app_config.bcrypt_cost)
            .await?;
    Ok(ApiResponse::with_data("User updated successfully", user))
}

/// Deactivate a user (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<ApiResponse<()>, AppError> {
    UserService::delete_user(state.users.as_ref(), id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
