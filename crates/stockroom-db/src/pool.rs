//! # Storage Handle
//!
//! Opens the SQLite file behind a small sqlx pool and hands out
//! repositories and posting transactions.
//!
//! ## Where the handle lives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         One CLI invocation                              │
//! │                                                                         │
//! │   DbConfig::new(stockroom.db)                                          │
//! │        │  pool size, timeouts, migrate flag                             │
//! │        ▼                                                                │
//! │   Database::new ──► pragmas ──► SqlitePool ──► embedded migrations      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   InventoryService { db }      (no global; passed by value)            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   Database::close              (also after a failed command)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pragmas
//! File databases run in WAL journal mode with `synchronous = NORMAL`.
//! `foreign_keys` is switched on for every connection; the schema's
//! RESTRICT and SET NULL rules depend on it.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::repository::purchase::PurchaseRepository;
use crate::repository::report::ReportRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::supplier::SupplierRepository;

/// Path marker for a private in-memory database.
const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// DbConfig
// =============================================================================

/// How to open the database.
///
/// ```rust,ignore
/// let config = DbConfig::new("stockroom.db").pool_size(1).migrate(false);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    path: PathBuf,
    pool_size: u32,
    min_idle: u32,
    acquire_timeout: Duration,
    idle_timeout: Duration,
    migrate: bool,
}

impl DbConfig {
    /// A file database at `path`, created on first open. The parent
    /// directory has to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            pool_size: 2,
            min_idle: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            migrate: true,
        }
    }

    /// A fresh private database that disappears with its connection.
    ///
    /// The pool is pinned to a single connection that never expires,
    /// otherwise a second connection would see an empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            path: PathBuf::from(MEMORY_PATH),
            pool_size: 1,
            min_idle: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60 * 60),
            migrate: true,
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    /// Apply pending migrations while opening (default on).
    pub fn migrate(mut self, migrate: bool) -> Self {
        self.migrate = migrate;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.pool_size)
            .min_connections(self.min_idle.min(self.pool_size))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout));

        if self.is_in_memory() {
            options.max_lifetime(None)
        } else {
            options
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database. Clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `config` and, unless disabled, brings
    /// the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(pool_size = config.pool_size, "Pool connected");

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a posting transaction.
    ///
    /// Dropping it uncommitted rolls back, so an early `?` inside a posting
    /// leaves no partial writes behind.
    pub(crate) async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(DbError::transaction)
    }

    pub(crate) fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub(crate) fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    pub(crate) fn purchases(&self) -> PurchaseRepository {
        PurchaseRepository::new(self.pool.clone())
    }

    pub(crate) fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub(crate) fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Copies the live database into a new file at `target`.
    ///
    /// `VACUUM INTO` reads inside one transaction, so the copy is
    /// consistent and includes pages still in the WAL. An existing
    /// `target` is refused.
    pub async fn backup_to(&self, target: &Path) -> DbResult<()> {
        if target.exists() {
            return Err(DbError::duplicate("backup file", target.display().to_string()));
        }

        sqlx::query("VACUUM INTO ?1")
            .bind(target.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await?;

        info!(target = %target.display(), "Database backed up");
        Ok(())
    }

    /// Waits for checked-out connections and closes the pool. Later calls
    /// through this handle fail.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }
}
