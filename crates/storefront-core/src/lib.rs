//! # Storefront Core
//!
//! Core types, errors, and utilities for the Storefront API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type and its HTTP rendering
//! - [`pagination`]: Page requests and pagination metadata
//! - [`password`]: Password hashing and verification
//! - [`response`]: The uniform response envelope
//!
//! # Example
//!
//! ```ignore
//! use storefront_core::{AppError, ApiResponse, PaginationInfo};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Product not found"));
//! let body = ApiResponse::with_data("Product retrieved successfully", product);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorReport};
pub use pagination::{Page, PageRequest, PaginationInfo, SortOrder};
pub use password::{hash_password_with_cost, verify_password};
pub use response::{ApiResponse, Created, FieldViolation, MessageResponse};
