//! # Service Errors
//!
//! The one error type front ends see.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                         → ServiceError                          │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  ValidationError                → Validation                            │
//! │  CoreError::InsufficientStock   → InsufficientStock                     │
//! │  CoreError / DbError NotFound   → NotFound                              │
//! │  DbError::UniqueViolation       → Validation (Duplicate)                │
//! │  ledger rows on hard delete     → InUse                                 │
//! │  every other DbError            → Storage (logged at error level)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::error::DbError;

/// Errors returned by [`InventoryService`](crate::InventoryService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced product or supplier doesn't exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A sale asked for more than is on hand.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Hard delete refused because ledger rows still point at the entity.
    #[error("{entity} {id} is referenced by {references} ledger row(s); deactivate it instead")]
    InUse {
        entity: String,
        id: String,
        references: i64,
    },

    /// The database failed underneath us.
    #[error("Storage error: {0}")]
    Storage(DbError),
}

/// Coarse error category for front ends (exit codes, message styling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InsufficientStock,
    InUse,
    Storage,
}

impl ErrorKind {
    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::InUse => "IN_USE",
            ErrorKind::Storage => "STORAGE_ERROR",
        }
    }
}

impl ServiceError {
    /// Creates a NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            ServiceError::InUse { .. } => ErrorKind::InUse,
            ServiceError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            DbError::UniqueViolation { field, value } => {
                ServiceError::Validation(ValidationError::Duplicate { field, value })
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ServiceError::Storage(other)
            }
        }
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => ServiceError::InsufficientStock {
                sku,
                available,
                requested,
            },
            CoreError::Validation(e) => ServiceError::Validation(e),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_kinds() {
        let err: ServiceError = DbError::not_found("Product", "p-1").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Product not found: p-1");

        let err: ServiceError = DbError::duplicate("sku", "WID-1").into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "sku 'WID-1' already exists");

        let err: ServiceError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_core_errors_map_to_kinds() {
        let err: ServiceError = CoreError::InsufficientStock {
            sku: "WIDGET".to_string(),
            available: 4,
            requested: 100,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(err.kind().code(), "INSUFFICIENT_STOCK");

        let err: ServiceError = CoreError::Validation(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "quantity must be positive");
    }
}
