//! # Storefront Models
//!
//! Domain models and DTOs for the Storefront API.
//!
//! - [`users`]: User entity, roles, request bodies and list query
//! - [`products`]: Product entity, request bodies, list query and statistics
//! - [`validation`]: Custom `validator` rules shared by the DTOs
//!
//! Request DTOs derive `validator::Validate`; the HTTP layer runs them before
//! any handler sees the payload. Entities serialize in camelCase and never
//! carry secrets: the password hash only exists on [`UserRecord`].

pub mod products;
pub mod users;
pub mod validation;

pub use products::{
    CreateProductDto, NewProduct, Product, ProductChanges, ProductFilter, ProductListQuery,
    ProductSortField, ProductStats, UpdateProductDto,
};
pub use users::{
    CreateUserDto, LoginRequest, LoginResponse, NewUser, UpdateUserDto, User, UserChanges,
    UserFilter, UserListQuery, UserRecord, UserRole, UserSortField,
};
