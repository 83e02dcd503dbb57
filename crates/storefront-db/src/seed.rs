//! Idempotent bootstrap data: a default administrator and a small catalogue.

use storefront_core::{AppError, hash_password_with_cost};
use storefront_models::{NewProduct, NewUser, UserRole};
use tracing::info;

use crate::store::{ProductStore, UserStore};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub products_created: usize,
}

pub fn sample_products() -> Vec<NewProduct> {
    [
        (
            "Laptop Pro",
            "High-performance laptop for professionals",
            1299.99,
            "Electronics",
            50,
        ),
        (
            "Wireless Headphones",
            "Noise-cancelling wireless headphones",
            199.99,
            "Electronics",
            100,
        ),
        (
            "Coffee Maker",
            "Automatic coffee maker with timer",
            89.99,
            "Appliances",
            25,
        ),
        (
            "Running Shoes",
            "Comfortable running shoes for all terrains",
            129.99,
            "Sports",
            75,
        ),
        (
            "Smart Watch",
            "Fitness tracking smart watch",
            299.99,
            "Electronics",
            30,
        ),
    ]
    .into_iter()
    .map(|(name, description, price, category, stock)| NewProduct {
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
        category: category.to_string(),
        stock,
    })
    .collect()
}

/// Creates the default admin if neither its username nor its email is taken,
/// and the sample catalogue if there are no products at all. Safe to run on
/// every start, including after the seeded admin has been edited.
pub async fn seed_defaults(
    users: &dyn UserStore,
    products: &dyn ProductStore,
    bcrypt_cost: u32,
) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();

    let admin_taken = users
        .is_taken(Some(DEFAULT_ADMIN_USERNAME), Some(DEFAULT_ADMIN_EMAIL), None)
        .await?;

    if !admin_taken {
        let password_hash = hash_password_with_cost(DEFAULT_ADMIN_PASSWORD, bcrypt_cost)?;
        users
            .create(NewUser {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password_hash,
                role: UserRole::Admin,
            })
            .await?;
        report.admin_created = true;
        info!(email = DEFAULT_ADMIN_EMAIL, "Default admin user created");
    }

    if products.count().await? == 0 {
        for product in sample_products() {
            products.create(product).await?;
            report.products_created += 1;
        }
        info!(count = report.products_created, "Sample products created");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryProductStore, MemoryUserStore};
    use storefront_core::verify_password;
    use storefront_models::UserChanges;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let users = MemoryUserStore::new();
        let products = MemoryProductStore::new();

        let first = seed_defaults(&users, &products, 4).await.unwrap();
        assert!(first.admin_created);
        assert_eq!(first.products_created, 5);

        let second = seed_defaults(&users, &products, 4).await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(products.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_seeded_admin_can_authenticate() {
        let users = MemoryUserStore::new();
        let products = MemoryProductStore::new();
        seed_defaults(&users, &products, 4).await.unwrap();

        let record = users.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().unwrap();
        assert_eq!(record.user.role, UserRole::Admin);
        assert!(verify_password(DEFAULT_ADMIN_PASSWORD, &record.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_reseed_after_admin_email_change() {
        let users = MemoryUserStore::new();
        let products = MemoryProductStore::new();
        seed_defaults(&users, &products, 4).await.unwrap();

        let admin = users.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().unwrap();
        users
            .update(
                admin.user.id,
                UserChanges {
                    email: Some("ops@example.com".to_string()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();

        let report = seed_defaults(&users, &products, 4).await.unwrap();
        assert!(!report.admin_created);
        assert!(users.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reseed_after_admin_rename() {
        let users = MemoryUserStore::new();
        let products = MemoryProductStore::new();
        seed_defaults(&users, &products, 4).await.unwrap();

        let admin = users.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().unwrap();
        users
            .update(
                admin.user.id,
                UserChanges {
                    username: Some("operator".to_string()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();

        let report = seed_defaults(&users, &products, 4).await.unwrap();
        assert!(!report.admin_created);
    }

    #[test]
    fn test_sample_catalogue() {
        let products = sample_products();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Laptop Pro");
        assert_eq!(
            products.iter().filter(|p| p.category == "Electronics").count(),
            3
        );
    }
}
