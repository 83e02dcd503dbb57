use anyhow::anyhow;
use storefront_core::{AppError, Page};
use storefront_db::{PRODUCT_CONFLICT, ProductStore};
use storefront_models::{
    CreateProductDto, Product, ProductChanges, ProductFilter, ProductStats, UpdateProductDto,
};
use tracing::{info, instrument};
use uuid::Uuid;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

fn not_found() -> AppError {
    AppError::not_found(anyhow!(PRODUCT_NOT_FOUND))
}

fn conflict() -> AppError {
    AppError::conflict(anyhow!(PRODUCT_CONFLICT))
}

pub struct ProductService;

impl ProductService {
    #[instrument(skip(products, dto), fields(name = %dto.name))]
    pub async fn create_product(
        products: &dyn ProductStore,
        dto: CreateProductDto,
    ) -> Result<Product, AppError> {
        let new_product = dto.into_new_product();

        if products.name_taken(&new_product.name, None).await? {
            return Err(conflict());
        }

        let product = products.create(new_product).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    pub async fn get_products(
        products: &dyn ProductStore,
        filter: &ProductFilter,
    ) -> Result<Page<Product>, AppError> {
        products.list(filter).await
    }

    pub async fn get_product(products: &dyn ProductStore, id: Uuid) -> Result<Product, AppError> {
        products.find_by_id(id).await?.ok_or_else(not_found)
    }

    #[instrument(skip(products, dto))]
    pub async fn update_product(
        products: &dyn ProductStore,
        id: Uuid,
        dto: UpdateProductDto,
    ) -> Result<Product, AppError> {
        let existing = Self::get_product(products, id).await?;

        let mut changes = dto.into_changes();
        changes.name = changes.name.filter(|name| *name != existing.name);

        if let Some(name) = changes.name.as_deref() {
            if products.name_taken(name, Some(id)).await? {
                return Err(conflict());
            }
        }

        let product = products.update(id, changes).await?.ok_or_else(not_found)?;
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Soft delete: the record stays, inactive.
    #[instrument(skip(products))]
    pub async fn delete_product(products: &dyn ProductStore, id: Uuid) -> Result<(), AppError> {
        products
            .update(id, ProductChanges::deactivate())
            .await?
            .ok_or_else(not_found)?;

        info!(product_id = %id, "Product deactivated");
        Ok(())
    }

    pub async fn get_categories(products: &dyn ProductStore) -> Result<Vec<String>, AppError> {
        products.categories().await
    }

    pub async fn get_stats(products: &dyn ProductStore) -> Result<ProductStats, AppError> {
        products.stats().await
    }
}
