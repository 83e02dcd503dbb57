//! PostgreSQL stores.
//!
//! Queries are built at runtime with [`sqlx::QueryBuilder`] so list filters
//! and partial updates only bind the parts that are present. Sort columns
//! come from the whitelisted sort enums, never from request text.

mod products;
mod users;

pub use products::PgProductStore;
pub use users::PgUserStore;

use storefront_core::PageRequest;

/// `LIMIT`/`OFFSET` values for a page. Offsets past `i64::MAX` are clamped so
/// an absurd page number yields an empty page instead of a negative offset.
pub(crate) fn limit_offset(page: PageRequest) -> (i64, i64) {
    let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

/// Escapes `LIKE` metacharacters and wraps the term for a substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
