//! Fake data generation.
//!
//! Generated records carry a numeric suffix so repeated runs within one
//! batch never collide on the unique username, email or product name
//! columns. Collisions with rows from earlier runs are skipped.

use std::time::Instant;

use fake::Fake;
use fake::faker::company::en::Buzzword;
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::FirstName;
use storefront_core::{AppError, hash_password_with_cost};
use storefront_db::{ProductStore, UserStore};
use storefront_models::{NewProduct, NewUser, UserRole};

pub const CATEGORIES: [&str; 6] = [
    "Electronics",
    "Appliances",
    "Sports",
    "Books",
    "Home",
    "Toys",
];

/// Password given to every generated user.
pub const FAKE_USER_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub products: usize,
    pub users: usize,
}

impl SeedConfig {
    pub fn new(products: usize, users: usize) -> Self {
        Self { products, users }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FakeSeedReport {
    pub products_created: usize,
    pub users_created: usize,
    pub skipped: usize,
}

pub fn generate_products(count: usize) -> Vec<NewProduct> {
    let run: u32 = (1000..10000).fake();

    (0..count)
        .map(|idx| {
            let buzzword: String = Buzzword().fake();
            let word: String = Word().fake();
            let mut name = format!("{} {} {}-{}", capitalize(&buzzword), word, run, idx);
            name.truncate(100);

            let category = CATEGORIES[(0..CATEGORIES.len()).fake::<usize>()];
            let cents: i64 = (100..250_000).fake();

            NewProduct {
                name,
                description: Some(Sentence(4..10).fake::<String>()).map(|mut d| {
                    d.truncate(500);
                    d
                }),
                price: cents as f64 / 100.0,
                category: category.to_string(),
                stock: (0..500).fake::<i32>(),
            }
        })
        .collect()
}

pub fn generate_users(count: usize, password_hash: &str) -> Vec<NewUser> {
    let run: u32 = (1000..10000).fake();

    (0..count)
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let base: String = first_name
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_lowercase();
            let suffix = format!("{}{}", run, idx);
            let keep = 30usize.saturating_sub(suffix.len());
            let mut username: String = base.chars().take(keep).collect();
            if username.is_empty() {
                username.push_str("user");
            }
            username.push_str(&suffix);

            NewUser {
                email: format!("{}@example.com", username),
                username,
                password_hash: password_hash.to_string(),
                role: UserRole::User,
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inserts fake products and users through the stores.
pub async fn seed_fake(
    users: &dyn UserStore,
    products: &dyn ProductStore,
    config: SeedConfig,
    bcrypt_cost: u32,
) -> Result<FakeSeedReport, AppError> {
    let start = Instant::now();
    let mut report = FakeSeedReport::default();

    for product in generate_products(config.products) {
        match products.create(product).await {
            Ok(_) => report.products_created += 1,
            Err(err) if err.status.as_u16() == 409 => report.skipped += 1,
            Err(err) => return Err(err),
        }
    }

    if config.users > 0 {
        // One hash for the whole batch.
        let password_hash = hash_password_with_cost(FAKE_USER_PASSWORD, bcrypt_cost)?;
        for user in generate_users(config.users, &password_hash) {
            match users.create(user).await {
                Ok(_) => report.users_created += 1,
                Err(err) if err.status.as_u16() == 409 => report.skipped += 1,
                Err(err) => return Err(err),
            }
        }
    }

    println!(
        "✅ Seeded {} products and {} users in {:.2?} ({} skipped)",
        report.products_created,
        report.users_created,
        start.elapsed(),
        report.skipped
    );

    Ok(report)
}
