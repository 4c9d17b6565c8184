//! Request payloads, response schemas and database row mappings.
//!
//! Row structs (`*Record`) stay internal to the repository layer; everything else is part
//! of the public JSON contract and derives `ToSchema` (OpenAPI) and `TS` (frontend types).

pub mod blog;
pub mod catalog;
pub mod contact;
pub mod menu;
pub mod newsletter;
pub mod settings;
pub mod user;

pub use blog::*;
pub use catalog::*;
pub use contact::*;
pub use menu::*;
pub use newsletter::*;
pub use settings::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

// --- Shared Response Schemas ---

/// MessageResponse
///
/// Body returned by mutations that have no resource payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Page
///
/// Envelope for paginated listings. `total` is counted under the same filter as the
/// page itself, independent of `skip`/`limit`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[ts(type = "number")]
    pub total: i64,
    #[ts(type = "number")]
    pub skip: i64,
    #[ts(type = "number")]
    pub limit: i64,
}

/// Pagination
///
/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Applies defaults and enforces `skip >= 0`, `1 <= limit <= 100`.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> AppResult<Self> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if skip < 0 {
            return Err(AppError::validation("skip must be greater than or equal to 0"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(Self { skip, limit })
    }

    pub fn wrap<T>(self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            total,
            skip: self.skip,
            limit: self.limit,
        }
    }
}

// --- Input Validation Helpers ---

pub(crate) fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_opt_text(field: &str, value: Option<&str>) -> AppResult<()> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain, no whitespace.
pub(crate) fn require_email(value: &str) -> AppResult<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("value is not a valid email address"))
    }
}

/// Slugs are lowercase ASCII alphanumerics separated by single hyphens.
pub(crate) fn require_slug(value: &str) -> AppResult<()> {
    let valid = !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(
            "slug must contain only lowercase letters, digits and single hyphens",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(Pagination::new(None, None).unwrap(), Pagination::default());
    }

    #[test]
    fn pagination_bounds() {
        assert!(Pagination::new(Some(-1), None).is_err());
        assert!(Pagination::new(None, Some(0)).is_err());
        assert!(Pagination::new(None, Some(101)).is_err());
        assert_eq!(Pagination::new(Some(20), Some(100)).unwrap().limit, 100);
    }

    #[test]
    fn email_shapes() {
        assert!(require_email("jane@example.com").is_ok());
        assert!(require_email("jane@localhost").is_err());
        assert!(require_email("@example.com").is_err());
        assert!(require_email("jane doe@example.com").is_err());
        assert!(require_email("jane@@example.com").is_err());
    }

    #[test]
    fn slug_shapes() {
        assert!(require_slug("hello-world-2").is_ok());
        assert!(require_slug("Hello").is_err());
        assert!(require_slug("-lead").is_err());
        assert!(require_slug("double--dash").is_err());
        assert!(require_slug("").is_err());
    }
}
