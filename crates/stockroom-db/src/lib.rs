//! # stockroom-db: Database Layer for Stockroom
//!
//! Everything that touches the SQLite file: the sqlx pool, the embedded
//! schema, one repository per table and the [`InventoryService`] that
//! posts purchases and sales atomically.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  CLI command (stockroom sale record ...)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────────────────────────────────────────┐    │   │
//! │  │   │  InventoryService (service/)                          │    │   │
//! │  │   │  validate → mutate stock → append ledger (1 tx)       │    │   │
//! │  │   └───────────────┬───────────────────────────────────────┘    │   │
//! │  │                   │                                             │   │
//! │  │   ┌───────────────▼───┐    ┌───────────────┐    ┌──────────┐  │   │
//! │  │   │   Repositories    │    │   Database    │    │Migrations│  │   │
//! │  │   │ Product Supplier  │───►│   (pool.rs)   │    │(embedded)│  │   │
//! │  │   │ Purchase Sale     │    │  SqlitePool   │    │ 001_*.sql│  │   │
//! │  │   │ Report            │    │               │    │          │  │   │
//! │  │   └───────────────────┘    └───────────────┘    └──────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/stockroom/stockroom.db                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - `DbConfig`, `Database`, backup
//! - [`migrations`] - `migrations/sqlite/*.sql` baked in at compile time
//! - [`error`] - `DbError`
//! - `repository` - SQL per table, plus report aggregates (crate-private;
//!   callers go through the service)
//! - [`service`] - `InventoryService` and `ServiceError`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig, InventoryService};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//! let service = InventoryService::new(db);
//!
//! let posting = service.record_sale(new_sale).await?;
//! println!("stock is now {}", posting.new_stock);
//!
//! service.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub(crate) mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{ErrorKind, InventoryService, ServiceError, ServiceResult};
