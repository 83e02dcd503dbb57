//! Custom validation rules.

use std::borrow::Cow;

use validator::ValidationError;

/// Letters and digits only (ASCII).
pub fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric")
            .with_message(Cow::Borrowed("must only contain alpha-numeric characters")))
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")))
    } else {
        Ok(())
    }
}

/// Trims a string, mapping an empty result to `None`.
pub fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric() {
        assert!(alphanumeric("alice42").is_ok());
        assert!(alphanumeric("Alice").is_ok());
        assert!(alphanumeric("alice_42").is_err());
        assert!(alphanumeric("al ice").is_err());
        assert!(alphanumeric("").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed(Some("  lap ")), Some("lap".to_string()));
        assert_eq!(trimmed(Some("   ")), None);
        assert_eq!(trimmed(None), None);
    }
}
