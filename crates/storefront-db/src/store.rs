//! Store traits.

use async_trait::async_trait;
use storefront_core::{AppError, Page};
use storefront_models::{
    NewProduct, NewUser, Product, ProductChanges, ProductFilter, ProductStats, User, UserChanges,
    UserFilter, UserRecord,
};
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with 409 if the username or email is taken.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Looks up by (lower-cased) email, including the password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Whether another user already holds `username` or `email`.
    /// `exclude` skips the user being updated.
    async fn is_taken(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError>;

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, AppError>;

    /// Applies `changes` and bumps `updated_at`. `None` if no such user.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a product. Fails with 409 if the name is taken.
    async fn create(&self, product: NewProduct) -> Result<Product, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    /// Whether another product already uses `name`.
    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, AppError>;

    async fn list(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError>;

    /// Applies `changes` and bumps `updated_at`. `None` if no such product.
    async fn update(&self, id: Uuid, changes: ProductChanges)
    -> Result<Option<Product>, AppError>;

    /// Distinct categories of active products, sorted.
    async fn categories(&self) -> Result<Vec<String>, AppError>;

    async fn stats(&self) -> Result<ProductStats, AppError>;

    async fn count(&self) -> Result<u64, AppError>;
}
