use anyhow::anyhow;
use storefront_auth::create_access_token;
use storefront_config::JwtConfig;
use storefront_core::{AppError, Page, hash_password_with_cost, verify_password};
use storefront_db::{USER_CONFLICT, UserStore};
use storefront_models::{
    CreateUserDto, LoginRequest, LoginResponse, NewUser, UpdateUserDto, User, UserChanges,
    UserFilter,
};
use tracing::{info, instrument};
use uuid::Uuid;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const USER_NOT_FOUND: &str = "User not found";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn not_found() -> AppError {
    AppError::not_found(anyhow!(USER_NOT_FOUND))
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(anyhow!(INVALID_CREDENTIALS))
}

pub struct UserService;

impl UserService {
    #[instrument(skip(users, dto), fields(username = %dto.username))]
    pub async fn create_user(
        users: &dyn UserStore,
        dto: CreateUserDto,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        let username = dto.username.trim().to_string();
        let email = normalize_email(&dto.email);

        if users.is_taken(Some(&username), Some(&email), None).await? {
            return Err(AppError::conflict(anyhow!(USER_CONFLICT)));
        }

        let password_hash = hash_password_with_cost(&dto.password, bcrypt_cost)?;
        let user = users
            .create(NewUser {
                username,
                email,
                password_hash,
                role: dto.role.unwrap_or_default(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn get_users(users: &dyn UserStore, filter: &UserFilter) -> Result<Page<User>, AppError> {
        users.list(filter).await
    }

    pub async fn get_user(users: &dyn UserStore, id: Uuid) -> Result<User, AppError> {
        users.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Merges the supplied fields. Unique keys are only checked when they change.
    #[instrument(skip(users, dto))]
    pub async fn update_user(
        users: &dyn UserStore,
        id: Uuid,
        dto: UpdateUserDto,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(users, id).await?;

        let username = dto
            .username
            .map(|username| username.trim().to_string())
            .filter(|username| *username != existing.username);
        let email = dto
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| *email != existing.email);

        if (username.is_some() || email.is_some())
            && users
                .is_taken(username.as_deref(), email.as_deref(), Some(id))
                .await?
        {
            return Err(AppError::conflict(anyhow!(USER_CONFLICT)));
        }

        let password_hash = dto
            .password
            .as_deref()
            .map(|password| hash_password_with_cost(password, bcrypt_cost))
            .transpose()?;

        let changes = UserChanges {
            username,
            email,
            password_hash,
            role: dto.role,
            is_active: dto.is_active,
        };

        let user = users.update(id, changes).await?.ok_or_else(not_found)?;
        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Soft delete: the record stays, inactive.
    #[instrument(skip(users))]
    pub async fn delete_user(users: &dyn UserStore, id: Uuid) -> Result<(), AppError> {
        users
            .update(id, UserChanges::deactivate())
            .await?
            .ok_or_else(not_found)?;

        info!(user_id = %id, "User deactivated");
        Ok(())
    }

    /// Every failure (unknown email, inactive account, wrong password) is the
    /// same 401, and every path pays for one bcrypt round at `bcrypt_cost` so
    /// response time does not reveal which accounts exist.
    #[instrument(skip(users, dto, jwt_config))]
    pub async fn login(
        users: &dyn UserStore,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
        bcrypt_cost: u32,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(record) = users.find_by_email(&email).await? else {
            hash_password_with_cost(&dto.password, bcrypt_cost)?;
            return Err(invalid_credentials());
        };

        let password_matches = verify_password(&dto.password, &record.password_hash)?;
        if !password_matches || !record.user.is_active {
            return Err(invalid_credentials());
        }

        let user = record.user;
        let token = create_access_token(
            user.id,
            &user.username,
            &user.email,
            user.role.as_str(),
            jwt_config,
        )?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse { user, token })
    }
}
