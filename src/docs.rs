use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use storefront_core::{FieldViolation, MessageResponse, PaginationInfo, SortOrder};
use storefront_models::{
    CreateProductDto, CreateUserDto, LoginRequest, LoginResponse, Product, ProductSortField,
    ProductStats, UpdateProductDto, UpdateUserDto, User, UserRole, UserSortField,
};

use crate::modules::health::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::health::controller::api_docs,
        crate::modules::users::controller::login,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::products::controller::create_product,
        crate::modules::products::controller::get_products,
        crate::modules::products::controller::get_categories,
        crate::modules::products::controller::get_stats,
        crate::modules::products::controller::get_product,
        crate::modules::products::controller::update_product,
        crate::modules::products::controller::delete_product,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserSortField,
            CreateUserDto,
            UpdateUserDto,
            LoginRequest,
            LoginResponse,
            Product,
            ProductSortField,
            ProductStats,
            CreateProductDto,
            UpdateProductDto,
            HealthResponse,
            MessageResponse,
            FieldViolation,
            PaginationInfo,
            SortOrder,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status endpoints"),
        (name = "Users", description = "Authentication and user management endpoints"),
        (name = "Products", description = "Product catalogue endpoints")
    ),
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "A CRUD REST API for users and products built with Rust, Axum, and PostgreSQL, featuring JWT-based authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
