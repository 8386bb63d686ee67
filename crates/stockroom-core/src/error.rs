//! # Domain Errors
//!
//! Two layers live here. `ValidationError` is raised before anything is
//! written; `CoreError` adds the stock rule failures on top.
//!
//! ```text
//!   ValidationError ──┐
//!                     ├──► CoreError ──► ServiceError (stockroom-db) ──► exit code
//!   stock rules ──────┘
//! ```

use thiserror::Error;

/// Failures of the pure stock rules.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A sale asked for more units than are on hand. Nothing was written.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// ValidationError
// =============================================================================

/// Bad input. Every variant names the offending field so the CLI can
/// print the message as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} cannot be negative")]
    Negative { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Name or SKU already taken.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Posting against a deactivated product.
    #[error("{entity} {id} is inactive")]
    Inactive { entity: String, id: String },

    #[error("end date {end} is before start date {start}")]
    InvertedRange { start: String, end: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn too_long(field: &str, max: usize) -> Self {
        ValidationError::TooLong {
            field: field.to_string(),
            max,
        }
    }

    pub(crate) fn negative(field: &str) -> Self {
        ValidationError::Negative {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_messages() {
        let err = CoreError::InsufficientStock {
            sku: "WIDGET".to_string(),
            available: 4,
            requested: 100,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for WIDGET: available 4, requested 100"
        );
        assert_eq!(
            CoreError::not_found("Product", "abc").to_string(),
            "Product not found: abc"
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::negative("reorder level").to_string(),
            "reorder level cannot be negative"
        );
        assert_eq!(
            ValidationError::too_long("sku", 50).to_string(),
            "sku must be at most 50 characters"
        );
        assert_eq!(
            ValidationError::Inactive {
                entity: "Product".to_string(),
                id: "WID-1".to_string(),
            }
            .to_string(),
            "Product WID-1 is inactive"
        );
    }

    #[test]
    fn test_validation_wraps_into_core() {
        let err: CoreError = ValidationError::required("name").into();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }
}
