//! # Storefront CLI
//!
//! Database seeding utilities for Storefront testing and development.
//!
//! ```ignore
//! use storefront_cli::seeder::{seed_fake, SeedConfig};
//!
//! let report = seed_fake(&users, &products, SeedConfig::new(50, 10), 12).await?;
//! ```

pub mod seeder;
