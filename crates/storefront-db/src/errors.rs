//! Translation of database failures into [`AppError`].

use storefront_core::AppError;

pub const USER_CONFLICT: &str = "User with this email or username already exists";
pub const PRODUCT_CONFLICT: &str = "Product with this name already exists";

/// Unique-constraint violations become 409 with `conflict` as the message;
/// everything else is a 500 carrying `context`.
pub(crate) fn write_error(err: sqlx::Error, conflict: &'static str, context: &'static str) -> AppError {
    let unique_violation = matches!(
        &err,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation()
    );

    if unique_violation {
        AppError::conflict(anyhow::Error::new(err).context(conflict))
    } else {
        AppError::database(anyhow::Error::new(err).context(context))
    }
}

pub(crate) fn read_error(err: sqlx::Error, context: &'static str) -> AppError {
    AppError::database(anyhow::Error::new(err).context(context))
}
