//! # Storage Errors
//!
//! `DbError` classifies what went wrong below the service layer. The
//! service turns it into the user-facing taxonomy:
//!
//! ```text
//!   sqlx::Error ──► DbError ──► ServiceError ──► CLI exit code
//!                   │
//!                   ├─ NotFound            row missing
//!                   ├─ UniqueViolation     name / SKU taken
//!                   ├─ ForeignKeyViolation RESTRICT rule hit
//!                   ├─ CheckViolation      schema CHECK rejected a row
//!                   └─ Connection / Migration / Query / Transaction / PoolExhausted
//! ```

use sqlx::error::ErrorKind as SqlErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write. `field` is the column name
    /// taken from SQLite's message.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A foreign key rule rejected the write, e.g. deleting a product that
    /// ledger rows still point at.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK constraint (negative stock, zero quantity, ...) fired.
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN or COMMIT failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Classifies a failed BEGIN/COMMIT.
    pub(crate) fn transaction(err: sqlx::Error) -> Self {
        match DbError::from(err) {
            DbError::QueryFailed(msg) => DbError::TransactionFailed(msg),
            other => other,
        }
    }
}

/// `"UNIQUE constraint failed: products.sku"` → `"sku"`.
fn unique_column(message: &str) -> String {
    message
        .strip_prefix("UNIQUE constraint failed: ")
        .and_then(|cols| cols.split(',').next())
        .map(|col| col.trim().rsplit('.').next().unwrap_or(col).to_string())
        .unwrap_or_else(|| "value".to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    SqlErrorKind::UniqueViolation => DbError::UniqueViolation {
                        field: unique_column(&message),
                        value: "unknown".to_string(),
                    },
                    SqlErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    SqlErrorKind::CheckViolation | SqlErrorKind::NotNullViolation => {
                        DbError::CheckViolation { message }
                    }
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_unique_column_from_sqlite_message() {
        assert_eq!(unique_column("UNIQUE constraint failed: products.sku"), "sku");
        assert_eq!(
            unique_column("UNIQUE constraint failed: suppliers.name, suppliers.phone"),
            "name"
        );
        assert_eq!(unique_column("something else"), "value");
    }

    #[test]
    fn test_pool_errors() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            DbError::duplicate("sku", "WID-1").to_string(),
            "Duplicate sku: 'WID-1' already exists"
        );
        assert_eq!(
            DbError::not_found("Supplier", "s-1").to_string(),
            "Supplier not found: s-1"
        );
    }
}
