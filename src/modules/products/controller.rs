use axum::extract::State;
use storefront_core::{ApiResponse, AppError, Created, MessageResponse, PaginationInfo};
use storefront_models::{
    CreateProductDto, Product, ProductFilter, ProductListQuery, ProductStats, UpdateProductDto,
};
use tracing::instrument;

use crate::middleware::auth::OptionalAuthUser;
use crate::modules::products::service::ProductService;
use crate::state::AppState;
use crate::validator::{ResourceId, ValidatedJson, ValidatedQuery};

/// Create a new product (admin only)
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden", body = MessageResponse),
        (status = 409, description = "Product name already taken", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state, dto))]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateProductDto>,
) -> Result<Created<Product>, AppError> {
    let product = ProductService::create_product(state.products.as_ref(), dto).await?;
    Ok(Created(ApiResponse::with_data(
        "Product created successfully",
        product,
    )))
}

/// List products with pagination, sorting, search and filters
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products retrieved successfully", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Invalid query", body = MessageResponse)
    ),
    tag = "Products"
)]
#[instrument(skip(state, viewer), fields(viewer = ?viewer.0.as_ref().map(|user| user.id)))]
pub async fn get_products(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    ValidatedQuery(query): ValidatedQuery<ProductListQuery>,
) -> Result<ApiResponse<Vec<Product>>, AppError> {
    let filter = ProductFilter::from(query);
    let page = ProductService::get_products(state.products.as_ref(), &filter).await?;
    let pagination = PaginationInfo::for_request(filter.page, page.total);

    Ok(ApiResponse::paginated(
        "Products retrieved successfully",
        page.items,
        pagination,
    ))
}

/// Distinct categories of active products
#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses(
        (status = 200, description = "Product categories retrieved successfully", body = ApiResponse<Vec<String>>)
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<String>>, AppError> {
    let categories = ProductService::get_categories(state.products.as_ref()).await?;
    Ok(ApiResponse::with_data(
        "Product categories retrieved successfully",
        categories,
    ))
}

/// Aggregate counts, prices and stock over every product
#[utoipa::path(
    get,
    path = "/api/products/stats",
    responses(
        (status = 200, description = "Product statistics retrieved successfully", body = ApiResponse<ProductStats>)
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<ApiResponse<ProductStats>, AppError> {
    let stats = ProductService::get_stats(state.products.as_ref()).await?;
    Ok(ApiResponse::with_data(
        "Product statistics retrieved successfully",
        stats,
    ))
}

/// Get a product by ID, active or not
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product retrieved successfully", body = ApiResponse<Product>),
        (status = 400, description = "Invalid ID format", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    ),
    tag = "Products"
)]
#[instrument(skip(state, viewer), fields(viewer = ?viewer.0.as_ref().map(|user| user.id)))]
pub async fn get_product(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    ResourceId(id): ResourceId,
) -> Result<ApiResponse<Product>, AppError> {
    let product = ProductService::get_product(state.products.as_ref(), id).await?;
    Ok(ApiResponse::with_data("Product retrieved successfully", product))
}

/// Update a product; absent fields are left unchanged (admin only)
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse),
        (status = 409, description = "Product name already taken", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state, dto))]
pub async fn update_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(dto): ValidatedJson<UpdateProductDto>,
) -> Result<ApiResponse<Product>, AppError> {
    let product = ProductService::update_product(state.products.as_ref(), id, dto).await?;
    Ok(ApiResponse::with_data("Product updated successfully", product))
}

/// Deactivate a product (admin only)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<ApiResponse<()>, AppError> {
    ProductService::delete_product(state.products.as_ref(), id).await?;
    Ok(ApiResponse::message("Product deleted successfully"))
}
