//! SQL identifier validation and quoting
//!
//! Table and column names arrive from the command line and are interpolated
//! into query text, so they are validated against a strict pattern and then
//! double-quoted. Anything outside the pattern is rejected up front.

use crate::error::{CheckError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Validate a table or column name.
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
/// This is stricter than what SQLite itself allows, but it covers every
/// ordinary schema and makes injection through identifier positions impossible.
pub fn validate(name: &str) -> Result<()> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(())
    } else {
        Err(CheckError::InvalidIdentifier(name.to_string()))
    }
}

/// Validate an identifier and return it double-quoted for use in SQL text.
pub fn quoted(name: &str) -> Result<String> {
    validate(name)?;
    Ok(format!("\"{}\"", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate("users").is_ok());
        assert!(validate("user_id").is_ok());
        assert!(validate("_staging").is_ok());
        assert!(validate("Orders2024").is_ok());
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(validate("users; DROP TABLE users").is_err());
        assert!(validate("users\"--").is_err());
        assert!(validate("users.id").is_err());
        assert!(validate("user id").is_err());
        assert!(validate("").is_err());
        assert!(validate("1users").is_err());
    }

    #[test]
    fn quoting_wraps_in_double_quotes() {
        assert_eq!(quoted("orders").unwrap(), "\"orders\"");
        assert!(quoted("orders--").is_err());
    }
}
