//! Product domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::{PageRequest, SortOrder};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::validation::trimmed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Laptop Pro")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 1299.99)]
    pub price: f64,
    #[schema(example = "Electronics")]
    pub category: String,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload handed to the store. Strings are already trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub stock: i32,
}

/// Fields to overwrite on update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

impl ProductChanges {
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(
        length(min = 1, max = 100, message = "name must be between 1 and 100 characters"),
        custom(function = "crate::validation::not_blank", message = "name must not be blank")
    )]
    #[schema(example = "Widget")]
    pub name: String,
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    #[schema(example = 9.99)]
    pub price: f64,
    #[validate(
        length(min = 1, max = 50, message = "category must be between 1 and 50 characters"),
        custom(function = "crate::validation::not_blank", message = "category must not be blank")
    )]
    #[schema(example = "Tools")]
    pub category: String,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    #[schema(example = 5)]
    pub stock: i32,
}

impl CreateProductDto {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            description: trimmed(self.description.as_deref()),
            price: self.price,
            category: self.category.trim().to_string(),
            stock: self.stock,
        }
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    #[validate(
        length(min = 1, max = 100, message = "name must be between 1 and 100 characters"),
        custom(function = "crate::validation::not_blank", message = "name must not be blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(
        length(min = 1, max = 50, message = "category must be between 1 and 50 characters"),
        custom(function = "crate::validation::not_blank", message = "category must not be blank")
    )]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateProductDto {
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: self.name.map(|name| name.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            price: self.price,
            category: self.category.map(|c| c.trim().to_string()),
            stock: self.stock,
            is_active: self.is_active,
        }
    }
}

/// Whitelisted sort columns for product lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Price,
    Category,
    Stock,
}

impl ProductSortField {
    pub fn column(&self) -> &'static str {
        match self {
            ProductSortField::CreatedAt => "created_at",
            ProductSortField::UpdatedAt => "updated_at",
            ProductSortField::Name => "name",
            ProductSortField::Price => "price",
            ProductSortField::Category => "category",
            ProductSortField::Stock => "stock",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Page number, starting at 1
    #[validate(range(min = 1, message = "page must be greater than or equal to 1"))]
    pub page: Option<u64>,
    /// Page size, 1 to 100
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u64>,
    pub sort: Option<ProductSortField>,
    pub order: Option<SortOrder>,
    /// Case-insensitive match on name or description
    #[validate(length(max = 100, message = "search must be at most 100 characters"))]
    pub search: Option<String>,
    /// Exact category match
    #[validate(length(max = 50, message = "category must be at most 50 characters"))]
    pub category: Option<String>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
}

/// Normalized list criteria handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub sort: ProductSortField,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductListQuery::default().into()
    }
}

impl From<ProductListQuery> for ProductFilter {
    fn from(query: ProductListQuery) -> Self {
        Self {
            search: trimmed(query.search.as_deref()),
            category: trimmed(query.category.as_deref()),
            is_active: Some(query.is_active.unwrap_or(true)),
            sort: query.sort.unwrap_or_default(),
            order: query.order.unwrap_or_default(),
            page: PageRequest::new(query.page, query.limit),
        }
    }
}

/// Aggregates over every product, active or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: i64,
    pub active_products: i64,
    pub inactive_products: i64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub total_stock: i64,
}

impl ProductStats {
    /// Folds a product set into stats; all zeros for an empty set.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut stats = ProductStats::default();
        let mut price_sum = 0.0;

        for product in products {
            if stats.total_products == 0 {
                stats.min_price = product.price;
                stats.max_price = product.price;
            } else {
                stats.min_price = stats.min_price.min(product.price);
                stats.max_price = stats.max_price.max(product.price);
            }
            stats.total_products += 1;
            if product.is_active {
                stats.active_products += 1;
            } else {
                stats.inactive_products += 1;
            }
            price_sum += product.price;
            stats.total_stock += i64::from(product.stock);
        }

        if stats.total_products > 0 {
            stats.average_price = price_sum / stats.total_products as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreateProductDto {
        CreateProductDto {
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            category: "Tools".to_string(),
            stock: 5,
        }
    }

    fn product(price: f64, stock: i32, is_active: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: format!("p-{}", Uuid::new_v4()),
            description: None,
            price,
            category: "Tools".to_string(),
            stock,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_product_valid() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_create_product_zero_price_and_stock_allowed() {
        let dto = CreateProductDto {
            price: 0.0,
            stock: 0,
            ..dto()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_product_collects_all_violations() {
        let dto = CreateProductDto {
            name: String::new(),
            description: Some("d".repeat(501)),
            price: -1.0,
            category: "c".repeat(51),
            stock: -3,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "description", "price", "category", "stock"] {
            assert!(fields.contains_key(field), "missing violation for {field}");
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let dto = CreateProductDto {
            name: "   ".to_string(),
            ..dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_missing_required_field_is_a_deserialize_error() {
        let result = serde_json::from_str::<CreateProductDto>(r#"{"name":"Widget","price":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_into_new_product_trims() {
        let new = CreateProductDto {
            name: "  Widget ".to_string(),
            description: Some("   ".to_string()),
            category: " Tools".to_string(),
            ..dto()
        }
        .into_new_product();
        assert_eq!(new.name, "Widget");
        assert_eq!(new.category, "Tools");
        assert_eq!(new.description, None);
    }

    #[test]
    fn test_update_only_carries_supplied_fields() {
        let dto: UpdateProductDto = serde_json::from_str(r#"{"price":19.5}"#).unwrap();
        assert!(dto.validate().is_ok());
        let changes = dto.into_changes();
        assert_eq!(
            changes,
            ProductChanges {
                price: Some(19.5),
                ..ProductChanges::default()
            }
        );
    }

    #[test]
    fn test_filter_from_query() {
        let query = ProductListQuery {
            category: Some(" Electronics ".to_string()),
            search: Some(String::new()),
            ..ProductListQuery::default()
        };
        let filter = ProductFilter::from(query);
        assert_eq!(filter.category.as_deref(), Some("Electronics"));
        assert_eq!(filter.search, None);
        assert_eq!(filter.is_active, Some(true));
        assert_eq!(filter.sort.column(), "created_at");
    }

    #[test]
    fn test_sort_field_wire_format() {
        let field: ProductSortField = serde_json::from_str(r#""price""#).unwrap();
        assert_eq!(field, ProductSortField::Price);
        let field: ProductSortField = serde_json::from_str(r#""createdAt""#).unwrap();
        assert_eq!(field.column(), "created_at");
        assert!(serde_json::from_str::<ProductSortField>(r#""password""#).is_err());
    }

    #[test]
    fn test_stats_empty_is_zero() {
        let stats = ProductStats::from_products(Vec::<Product>::new().iter());
        assert_eq!(stats, ProductStats::default());
    }

    #[test]
    fn test_stats_over_mixed_products() {
        let products = vec![
            product(10.0, 5, true),
            product(30.0, 1, true),
            product(20.0, 4, false),
        ];
        let stats = ProductStats::from_products(&products);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.active_products, 2);
        assert_eq!(stats.inactive_products, 1);
        assert_eq!(stats.min_price, 10.0);
        assert_eq!(stats.max_price, 30.0);
        assert!((stats.average_price - 20.0).abs() < f64::EPSILON);
        assert_eq!(stats.total_stock, 10);
    }
}
