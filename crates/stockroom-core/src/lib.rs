//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! Products, suppliers and the two ledgers (purchases in, sales out) as
//! plain data, plus the arithmetic that moves stock between them. Nothing
//! in here opens a file or a connection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stockroom-cli                                │   │
//! │  │     product / supplier / purchase / sale / report commands      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            stockroom-db (InventoryService + repositories)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  receive  │  │   rules   │  │   │
//! │  │   │  Sale     │  │  totals   │  │  issue    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities, posting inputs, report rows, `DateRange`
//! - [`money`] - Integer-cent amounts and their text forms
//! - [`stock`] - receive / issue / low-stock rules
//! - [`error`] - `CoreError`, `ValidationError`
//! - [`validation`] - Field checks run before any write
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::money::Money;
//! use stockroom_core::stock;
//!
//! let unit_price = Money::from_cents(250);
//! assert_eq!(unit_price.multiply_quantity(4).cents(), 1000);
//!
//! // Selling 4 out of 10 leaves 6 on the shelf.
//! assert_eq!(stock::issue("WIDGET", 10, 4).unwrap(), 6);
//! assert!(stock::issue("WIDGET", 3, 4).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted for a single purchase or sale line.
///
/// Guards against typos such as 10000 instead of 100.
pub const MAX_POSTING_QUANTITY: i64 = 1_000_000;

/// Largest price or unit cost accepted, in cents.
///
/// Keeps `MAX_POSTING_QUANTITY × amount` well inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Default number of rows returned by "recent" ledger listings.
pub const DEFAULT_RECENT_LIMIT: u32 = 50;
