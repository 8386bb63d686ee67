//! # Settings
//!
//! User preferences kept in a small TOML file.
//!
//! ## Config File Location
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Settings Resolution                               │
//! │                                                                         │
//! │  1. --settings <path> / STOCKROOM_SETTINGS                             │
//! │  2. Platform config dir:                                               │
//! │     ~/.config/stockroom/settings.toml (Linux)                          │
//! │     ~/Library/Application Support/com.stockroom.stockroom/ (macOS)     │
//! │                                                                         │
//! │  Load order (later overrides earlier):                                 │
//! │     defaults → settings.toml → STOCKROOM_CURRENCY                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```toml
//! currency_symbol = "₹"
//! export_dir = "/home/asha/stockroom/exports"
//! backup_dir = "/home/asha/stockroom/backups"
//! ```
//!
//! `settings set` writes through to the file immediately. It starts from
//! the file alone, so an environment override is never persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stockroom_core::Money;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Default currency symbol.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Environment variable that overrides the currency symbol for one run.
pub const CURRENCY_ENV: &str = "STOCKROOM_CURRENCY";

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix used when printing money.
    pub currency_symbol: String,

    /// Where `export` writes CSV files. Current directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Where `backup` writes database copies. Current directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            export_dir: None,
            backup_dir: None,
        }
    }
}

impl Settings {
    /// Effective settings: the file at `path` (defaults when missing) with
    /// `STOCKROOM_CURRENCY` applied on top. Never save the result; use
    /// [`Settings::read`] for anything that writes back.
    pub fn load(path: &Path) -> CliResult<Self> {
        let settings = Settings::read(path)?;
        Ok(settings.with_currency_override(std::env::var(CURRENCY_ENV).ok()))
    }

    /// Exactly what the file at `path` holds, defaults when it doesn't exist.
    pub fn read(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Settings::default());
        }

        info!(path = %path.display(), "Loading settings");
        let load_err = |reason: String| CliError::SettingsLoad {
            path: path.to_path_buf(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| load_err(e.to_string()))
    }

    /// Writes the settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let save_err = |reason: String| CliError::SettingsSave {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
            }
        }

        let contents = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| save_err(e.to_string()))?;

        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Sets one key from its string form. Empty values reset the key.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        let value = value.trim();
        let dir = || (!value.is_empty()).then(|| PathBuf::from(value));

        match key {
            "currency_symbol" => {
                self.currency_symbol = if value.is_empty() {
                    DEFAULT_CURRENCY_SYMBOL.to_string()
                } else {
                    value.to_string()
                };
            }
            "export_dir" => self.export_dir = dir(),
            "backup_dir" => self.backup_dir = dir(),
            other => return Err(CliError::UnknownSetting(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let show = |dir: &Option<PathBuf>| {
            dir.as_ref()
                .map_or_else(|| "(current directory)".to_string(), |d| d.display().to_string())
        };
        vec![
            ("currency_symbol", self.currency_symbol.clone()),
            ("export_dir", show(&self.export_dir)),
            ("backup_dir", show(&self.backup_dir)),
        ]
    }

    /// Formats an amount with the configured symbol, e.g. `₹1,234.50`.
    pub fn format_money(&self, amount: Money) -> String {
        amount.display_with(&self.currency_symbol)
    }

    /// Formats a cents column.
    pub fn format_cents(&self, cents: i64) -> String {
        self.format_money(Money::from_cents(cents))
    }

    /// Export directory, defaulting to the working directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Backup directory, defaulting to the working directory.
    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Replaces the currency symbol with a non-blank `symbol`.
    pub fn with_currency_override(mut self, symbol: Option<String>) -> Self {
        if let Some(symbol) = symbol.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            debug!(symbol, "Overriding currency symbol from environment");
            self.currency_symbol = symbol.to_string();
        }
        self
    }

    /// Default settings file path in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }
}
