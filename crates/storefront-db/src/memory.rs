//! In-memory stores for tests and local experiments.
//!
//! Records live in insertion order behind a `tokio` [`RwLock`]. Uniqueness
//! checks and the write they guard happen under the same write lock, so the
//! stores keep the same 409 behaviour as the database under concurrency.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use storefront_core::{AppError, Page, PageRequest, SortOrder};
use storefront_models::{
    NewProduct, NewUser, Product, ProductChanges, ProductFilter, ProductSortField, ProductStats,
    User, UserChanges, UserFilter, UserRecord, UserSortField,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{PRODUCT_CONFLICT, USER_CONFLICT};
use crate::store::{ProductStore, UserStore};

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn paginate<T: Clone>(matching: Vec<&T>, page: PageRequest) -> Page<T> {
    let total = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit as usize)
        .cloned()
        .collect();
    Page { items, total }
}

fn conflict(message: &'static str) -> AppError {
    AppError::conflict(anyhow::anyhow!(message))
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn user_taken(
    records: &[UserRecord],
    username: Option<&str>,
    email: Option<&str>,
    exclude: Option<Uuid>,
) -> bool {
    records.iter().any(|record| {
        Some(record.user.id) != exclude
            && (username == Some(record.user.username.as_str())
                || email == Some(record.user.email.as_str()))
    })
}

fn compare_users(a: &User, b: &User, field: UserSortField) -> Ordering {
    match field {
        UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        UserSortField::Username => a.username.cmp(&b.username),
        UserSortField::Email => a.email.cmp(&b.email),
        UserSortField::Role => a.role.as_str().cmp(b.role.as_str()),
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut records = self.records.write().await;
        if user_taken(&records, Some(&user.username), Some(&user.email), None) {
            return Err(conflict(USER_CONFLICT));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        records.push(UserRecord {
            user: created.clone(),
            password_hash: user.password_hash,
        });
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.user.id == id)
            .map(|record| record.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.user.email == email).cloned())
    }

    async fn is_taken(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let records = self.records.read().await;
        Ok(user_taken(&records, username, email, exclude))
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, AppError> {
        let records = self.records.read().await;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matching: Vec<&User> = records
            .iter()
            .map(|record| &record.user)
            .filter(|user| filter.is_active.is_none_or(|active| user.is_active == active))
            .filter(|user| {
                search.as_deref().is_none_or(|term| {
                    contains_ci(&user.username, term) || contains_ci(&user.email, term)
                })
            })
            .collect();

        matching.sort_by(|a, b| directed(compare_users(a, b, filter.sort), filter.order));
        Ok(paginate(matching, filter.page))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut records = self.records.write().await;

        if user_taken(
            &records,
            changes.username.as_deref(),
            changes.email.as_deref(),
            Some(id),
        ) {
            return Err(conflict(USER_CONFLICT));
        }

        let Some(record) = records.iter_mut().find(|record| record.user.id == id) else {
            return Ok(None);
        };

        if let Some(username) = changes.username {
            record.user.username = username;
        }
        if let Some(email) = changes.email {
            record.user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            record.user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            record.user.is_active = is_active;
        }
        record.user.updated_at = Utc::now();

        Ok(Some(record.user.clone()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(products: &[Product], name: &str, exclude: Option<Uuid>) -> bool {
    products
        .iter()
        .any(|product| Some(product.id) != exclude && product.name == name)
}

fn compare_products(a: &Product, b: &Product, field: ProductSortField) -> Ordering {
    match field {
        ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ProductSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        ProductSortField::Name => a.name.cmp(&b.name),
        ProductSortField::Price => a.price.total_cmp(&b.price),
        ProductSortField::Category => a.category.cmp(&b.category),
        ProductSortField::Stock => a.stock.cmp(&b.stock),
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut products = self.products.write().await;
        if name_taken(&products, &product.name, None) {
            return Err(conflict(PRODUCT_CONFLICT));
        }

        let now = Utc::now();
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            stock: product.stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        products.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| product.id == id).cloned())
    }

    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let products = self.products.read().await;
        Ok(name_taken(&products, name, exclude))
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError> {
        let products = self.products.read().await;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matching: Vec<&Product> = products
            .iter()
            .filter(|p| filter.is_active.is_none_or(|active| p.is_active == active))
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|category| p.category == category)
            })
            .filter(|p| {
                search.as_deref().is_none_or(|term| {
                    contains_ci(&p.name, term)
                        || p.description.as_deref().is_some_and(|d| contains_ci(d, term))
                })
            })
            .collect();

        matching.sort_by(|a, b| directed(compare_products(a, b, filter.sort), filter.order));
        Ok(paginate(matching, filter.page))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().await;

        if let Some(name) = changes.name.as_deref() {
            if name_taken(&products, name, Some(id)) {
                return Err(conflict(PRODUCT_CONFLICT));
            }
        }

        let Some(product) = products.iter_mut().find(|product| product.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(category) = changes.category {
            product.category = category;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(is_active) = changes.is_active {
            product.is_active = is_active;
        }
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        let products = self.products.read().await;
        let mut categories: Vec<String> = products
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn stats(&self) -> Result<ProductStats, AppError> {
        let products = self.products.read().await;
        Ok(ProductStats::from_products(products.iter()))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_models::UserRole;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
        }
    }

    fn new_product(name: &str, category: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price,
            category: category.to_string(),
            stock: 10,
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let dup_name = store.create(new_user("alice", "other@example.com")).await;
        assert_eq!(dup_name.unwrap_err().status.as_u16(), 409);

        let dup_email = store.create(new_user("bob", "alice@example.com")).await;
        assert_eq!(dup_email.unwrap_err().status.as_u16(), 409);
    }

    #[tokio::test]
    async fn test_user_update_conflict_excludes_self() {
        let store = MemoryUserStore::new();
        let alice = store.create(new_user("alice", "alice@example.com")).await.unwrap();
        store.create(new_user("bob", "bob@example.com")).await.unwrap();

        let same = UserChanges {
            username: Some("alice".to_string()),
            ..UserChanges::default()
        };
        assert!(store.update(alice.id, same).await.unwrap().is_some());

        let taken = UserChanges {
            email: Some("bob@example.com".to_string()),
            ..UserChanges::default()
        };
        assert_eq!(
            store.update(alice.id, taken).await.unwrap_err().status.as_u16(),
            409
        );
    }

    #[tokio::test]
    async fn test_update_missing_user_is_none() {
        let store = MemoryUserStore::new();
        let result = store.update(Uuid::new_v4(), UserChanges::deactivate()).await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_list_search_and_active_filter() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();
        let bob = store.create(new_user("bob", "bob@shop.test")).await.unwrap();
        store.create(new_user("carol", "carol@shop.test")).await.unwrap();
        store.update(bob.id, UserChanges::deactivate()).await.unwrap();

        let page = store
            .list(&UserFilter {
                search: Some("SHOP".to_string()),
                ..UserFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].username, "carol");

        let inactive = store
            .list(&UserFilter {
                is_active: Some(false),
                ..UserFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(inactive.total, 1);
        assert_eq!(inactive.items[0].id, bob.id);
    }

    #[tokio::test]
    async fn test_product_list_paginates_and_sorts() {
        let store = MemoryProductStore::new();
        for (i, price) in [5.0, 1.0, 3.0, 4.0, 2.0].into_iter().enumerate() {
            store
                .create(new_product(&format!("P{i}"), "Tools", price))
                .await
                .unwrap();
        }

        let filter = ProductFilter {
            sort: ProductSortField::Price,
            order: SortOrder::Asc,
            page: PageRequest::new(Some(2), Some(2)),
            ..ProductFilter::default()
        };
        let page = store.list(&filter).await.unwrap();
        assert_eq!(page.total, 5);
        let prices: Vec<f64> = page.items.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_product_search_matches_description() {
        let store = MemoryProductStore::new();
        store.create(new_product("Kettle", "Appliances", 30.0)).await.unwrap();
        store.create(new_product("Mug", "Kitchen", 5.0)).await.unwrap();

        let page = store
            .list(&ProductFilter {
                search: Some("kettle desc".to_string()),
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Kettle");
    }

    #[tokio::test]
    async fn test_product_category_filter_is_exact() {
        let store = MemoryProductStore::new();
        store.create(new_product("A", "Tools", 1.0)).await.unwrap();
        store.create(new_product("B", "Toolset", 1.0)).await.unwrap();

        let page = store
            .list(&ProductFilter {
                category: Some("Tools".to_string()),
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_categories_skip_inactive_and_dedupe() {
        let store = MemoryProductStore::new();
        store.create(new_product("A", "Tools", 1.0)).await.unwrap();
        store.create(new_product("B", "Tools", 1.0)).await.unwrap();
        let c = store.create(new_product("C", "Garden", 1.0)).await.unwrap();
        store.create(new_product("D", "Books", 1.0)).await.unwrap();
        store.update(c.id, ProductChanges::deactivate()).await.unwrap();

        assert_eq!(store.categories().await.unwrap(), vec!["Books", "Tools"]);
    }

    #[tokio::test]
    async fn test_product_update_clears_empty_description() {
        let store = MemoryProductStore::new();
        let p = store.create(new_product("A", "Tools", 1.0)).await.unwrap();

        let updated = store
            .update(
                p.id,
                ProductChanges {
                    description: Some(String::new()),
                    ..ProductChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, None);
        assert!(updated.updated_at >= p.updated_at);
    }

    #[tokio::test]
    async fn test_stats_include_inactive() {
        let store = MemoryProductStore::new();
        store.create(new_product("A", "Tools", 10.0)).await.unwrap();
        let b = store.create(new_product("B", "Tools", 20.0)).await.unwrap();
        store.update(b.id, ProductChanges::deactivate()).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.inactive_products, 1);
        assert_eq!(stats.max_price, 20.0);
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
