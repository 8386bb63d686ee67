//! # Inventory Service
//!
//! The only way stock changes. Front ends call this and nothing below it.
//!
//! ## Posting Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Posting Flow                                    │
//! │                                                                         │
//! │  record_sale(NewSale)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate input (quantity, amounts)   ← nothing touched yet         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. BEGIN                                                              │
//! │       ├── load product (missing → NotFound, inactive → Validation)     │
//! │       ├── stock rule (short → InsufficientStock)                       │
//! │       ├── guarded stock UPDATE ... RETURNING current_stock             │
//! │       └── INSERT ledger row                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. COMMIT  (any earlier `?` drops the tx, which rolls back)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Posting { record, new_stock }                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - `posting` - record_purchase, record_sale, set_reorder_level
//! - `catalog` - product and supplier maintenance
//! - `reports` - read-only listings and aggregates, backup
//! - [`error`] - [`ServiceError`] and [`ErrorKind`]

mod catalog;
pub mod error;
mod posting;
mod reports;

pub use error::{ErrorKind, ServiceError, ServiceResult};

use tracing::info;

use crate::pool::{Database, DbConfig};

/// Upper bound on rows returned by product search.
pub const SEARCH_LIMIT: u32 = 200;

/// Transaction service over a [`Database`] handle.
///
/// ## Usage
/// ```rust,ignore
/// let service = InventoryService::open(DbConfig::new(path)).await?;
///
/// let posting = service.record_purchase(NewPurchase {
///     product_id: widget.id.clone(),
///     quantity: 20,
///     unit_cost: Money::from_cents(199),
///     ..Default::default()
/// }).await?;
///
/// service.close().await;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    /// Wraps an already opened database.
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    /// Opens the database described by `config` and wraps it.
    pub async fn open(config: DbConfig) -> ServiceResult<Self> {
        let db = Database::new(config).await?;
        Ok(InventoryService::new(db))
    }

    /// Direct storage access for tests. Everything else goes through the
    /// service so stock only moves inside a posting.
    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the connection pool. Call before the process exits.
    pub async fn close(&self) {
        info!("Shutting down inventory service");
        self.db.close().await;
    }
}

// =============================================================================
// Test Support
// =============================================================================
