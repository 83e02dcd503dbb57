use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use storefront_core::{AppError, Page};
use storefront_models::{NewProduct, Product, ProductChanges, ProductFilter, ProductStats};
use tracing::instrument;
use uuid::Uuid;

use super::{like_pattern, limit_offset};
use crate::errors::{PRODUCT_CONFLICT, read_error, write_error};
use crate::store::ProductStore;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, stock, is_active, created_at, updated_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE TRUE");

    if let Some(is_active) = filter.is_active {
        qb.push(" AND is_active = ").push_bind(is_active);
    }

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[derive(Clone, Debug)]
pub struct PgProductStore {
    db: PgPool,
}

impl PgProductStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: NewProduct) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (id, name, description, price, category, stock)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.stock)
        .fetch_one(&self.db)
        .await
        .map_err(|e| write_error(e, PRODUCT_CONFLICT, "Failed to insert product"))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| read_error(e, "Failed to fetch product by ID"))
    }

    #[instrument(skip(self))]
    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM products WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.db)
        .await
        .map_err(|e| read_error(e, "Failed to check product uniqueness"))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to count products"))?;

        let (limit, offset) = limit_offset(filter.page);
        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filters(&mut select, filter);
        select
            .push(format!(
                " ORDER BY {} {}, id {}",
                filter.sort.column(),
                filter.order.as_sql(),
                filter.order.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let items = select
            .build_query_as::<Product>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to fetch products"))?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = NOW()");

        if let Some(name) = changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(description) = changes.description {
            qb.push(", description = NULLIF(")
                .push_bind(description)
                .push(", '')");
        }
        if let Some(price) = changes.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(category) = changes.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(stock) = changes.stock {
            qb.push(", stock = ").push_bind(stock);
        }
        if let Some(is_active) = changes.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {PRODUCT_COLUMNS}"));

        qb.build_query_as::<Product>()
            .fetch_optional(&self.db)
            .await
            .map_err(|e| write_error(e, PRODUCT_CONFLICT, "Failed to update product"))
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE is_active ORDER BY category",
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| read_error(e, "Failed to fetch product categories"))
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> Result<ProductStats, AppError> {
        sqlx::query_as::<_, ProductStats>(
            r#"
            SELECT
                COUNT(*) AS total_products,
                COUNT(*) FILTER (WHERE is_active) AS active_products,
                COUNT(*) FILTER (WHERE NOT is_active) AS inactive_products,
                COALESCE(AVG(price), 0)::DOUBLE PRECISION AS average_price,
                COALESCE(MIN(price), 0)::DOUBLE PRECISION AS min_price,
                COALESCE(MAX(price), 0)::DOUBLE PRECISION AS max_price,
                COALESCE(SUM(stock), 0)::BIGINT AS total_stock
            FROM products
            "#,
        )
        .fetch_one(&self.db)
        .await
        .map_err(|e| read_error(e, "Failed to compute product statistics"))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to count products"))?;
        Ok(total.max(0) as u64)
    }
}
