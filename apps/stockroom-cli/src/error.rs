//! # CLI Error Handling
//!
//! Everything a command can fail with, and the process exit code for it.
//!
//! ## Exit Codes
//! ```text
//! ┌────────────────────────────┬──────┐
//! │ Error                      │ Code │
//! ├────────────────────────────┼──────┤
//! │ Validation / usage         │   2  │
//! │ Not found                  │   3  │
//! │ Insufficient stock         │   4  │
//! │ In use (hard delete)       │   5  │
//! │ Storage, I/O, settings     │   1  │
//! └────────────────────────────┴──────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use stockroom_core::ValidationError;
use stockroom_db::{ErrorKind, ServiceError};
use thiserror::Error;

/// Errors surfaced to the user by the `stockroom` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Any failure reported by the inventory service.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Bad argument combination that clap cannot express.
    #[error("{0}")]
    Usage(String),

    /// Settings file could not be read or parsed.
    #[error("Failed to load settings from {path}: {reason}")]
    SettingsLoad { path: PathBuf, reason: String },

    /// Settings file could not be written.
    #[error("Failed to save settings to {path}: {reason}")]
    SettingsSave { path: PathBuf, reason: String },

    /// Unknown key passed to `settings set`.
    #[error("Unknown setting '{0}' (expected currency_symbol, export_dir or backup_dir)")]
    UnknownSetting(String),

    /// No platform data directory and no explicit path.
    #[error("Could not determine the application data directory; pass --db")]
    NoDataDir,

    /// CSV writing failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON rendering failed.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Service(ServiceError::Validation(err))
    }
}

impl CliError {
    /// Numeric exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            CliError::Service(err) => match err.kind() {
                ErrorKind::Validation => 2,
                ErrorKind::NotFound => 3,
                ErrorKind::InsufficientStock => 4,
                ErrorKind::InUse => 5,
                ErrorKind::Storage => 1,
            },
            CliError::Usage(_) | CliError::UnknownSetting(_) => 2,
            _ => 1,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let err = CliError::from(ServiceError::not_found("Product", "WID-1"));
        assert_eq!(err.exit_status(), 3);

        let err = CliError::from(ServiceError::InsufficientStock {
            sku: "WID-1".to_string(),
            available: 4,
            requested: 100,
        });
        assert_eq!(err.exit_status(), 4);
        assert_eq!(
            err.to_string(),
            "Insufficient stock for WID-1: available 4, requested 100"
        );

        let err = CliError::UnknownSetting("colour".to_string());
        assert_eq!(err.exit_status(), 2);
    }
}
