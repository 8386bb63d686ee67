//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  InventoryService                                                      │
//! │       │                                                                 │
//! │       │  db.products().find("WID-1")                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── find / get_by_id / list / search      (pool, read)                │
//! │  ├── insert / update / deactivate / delete (pool, write)               │
//! │  └── increase_stock / decrease_stock       (crate-private, tx only)    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Stock columns and ledger rows are only written through a transaction  │
//! │  connection handed in by the service, never through the pool.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD, search and stock mutation
//! - [`SupplierRepository`] - Supplier CRUD
//! - [`PurchaseRepository`] - Purchase ledger
//! - [`SaleRepository`] - Sale ledger
//! - [`ReportRepository`] - Read-only aggregate queries
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`SupplierRepository`]: supplier::SupplierRepository
//! [`PurchaseRepository`]: purchase::PurchaseRepository
//! [`SaleRepository`]: sale::SaleRepository
//! [`ReportRepository`]: report::ReportRepository

pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod supplier;

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Turns user text into a `LIKE` pattern matching it as a substring.
///
/// `%`, `_` and `\` in the input are escaped, so queries must use
/// `ESCAPE '\'`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
