//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Product      │◄──│    Supplier     │  (optional reference)       │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (UUID)      │   │  id (UUID)      │                             │
//! │  │  sku, name      │   │  name, contact  │                             │
//! │  │  price_cents    │   └────────┬────────┘                             │
//! │  │  current_stock  │            │                                       │
//! │  │  reorder_level  │            │                                       │
//! │  └───────▲─────────┘            │                                       │
//! │          │                      │                                       │
//! │  ┌───────┴─────────┐   ┌────────▼────────┐                             │
//! │  │      Sale       │   │    Purchase     │   ← append-only ledger      │
//! │  │  quantity  (−)  │   │  quantity  (+)  │                             │
//! │  │  unit_price     │   │  unit_cost      │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: (sku, name) - human-readable, editable

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::stock;

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across products.
    pub name: String,

    /// Stock Keeping Unit - optional business identifier.
    pub sku: Option<String>,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Selling price in cents.
    pub price_cents: i64,

    /// Units on hand. Only postings change this.
    pub current_stock: i64,

    /// Threshold below which the product is flagged for replenishment.
    pub reorder_level: i64,

    /// Preferred supplier.
    pub supplier_id: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether stock has fallen below the reorder level.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        stock::is_low(self.current_stock, self.reorder_level)
    }

    /// Human label used in messages: the SKU when set, otherwise the name.
    pub fn label(&self) -> &str {
        self.sku.as_deref().unwrap_or(&self.name)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Money,
    pub reorder_level: i64,
    /// Stock on hand when the product is first recorded.
    pub opening_stock: i64,
    pub supplier_id: Option<String>,
}

/// Partial update of a product's editable fields.
///
/// `None` leaves a field untouched. For nullable columns the inner
/// `Option` is the new value, so `Some(None)` clears it.
///
/// Stock is deliberately absent: it only moves through postings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub price: Option<Money>,
    pub reorder_level: Option<i64>,
    pub supplier_id: Option<Option<String>>,
}

impl ProductUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.reorder_level.is_none()
            && self.supplier_id.is_none()
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier products are bought from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Partial update of a supplier. Same `Option<Option<_>>` convention as
/// [`ProductUpdate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact_name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl SupplierUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A recorded stock receipt. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    pub supplier_id: Option<String>,
    pub quantity: i64,
    /// Cost per unit in cents.
    pub unit_cost_cents: i64,
    /// quantity × unit cost.
    pub total_cents: i64,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Input for posting a purchase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPurchase {
    pub product_id: String,
    pub supplier_id: Option<String>,
    pub quantity: i64,
    pub unit_cost: Money,
    /// Defaults to the posting time.
    pub purchased_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Uses the snapshot pattern: the unit price is frozen at
/// the time of sale so later price edits don't rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit price.
    pub total_cents: i64,
    pub sold_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Input for posting a sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: String,
    pub quantity: i64,
    /// Defaults to the product's current price.
    pub unit_price: Option<Money>,
    /// Defaults to the posting time.
    pub sold_at: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Posting Result
// =============================================================================

/// The outcome of a posting: the ledger row that was written and the
/// product's stock after it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting<T> {
    pub record: T,
    pub new_stock: i64,
}

// =============================================================================
// Report Rows
// =============================================================================

/// One line of the stock snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: String,
    pub name: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub current_stock: i64,
    pub reorder_level: i64,
}

impl StockLevel {
    #[inline]
    pub fn is_low(&self) -> bool {
        stock::is_low(self.current_stock, self.reorder_level)
    }
}

/// Sales totals for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesSummary {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue_cents: i64,
}

impl SalesSummary {
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

/// A purchase joined with product and supplier names for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseLine {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub quantity: i64,
    pub unit_cost_cents: i64,
    pub total_cents: i64,
    pub purchased_at: DateTime<Utc>,
}

/// A sale joined with the product name for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub sold_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Date Range
// =============================================================================

/// A half-open UTC window `[start, end)` for ledger and report queries.
///
/// Stored timestamps carry nanoseconds. Queries compare `>= start` and
/// `< end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Creates `[start, end)`, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Covers whole calendar days, `first` and `last` included: from
    /// `first` 00:00 UTC up to, not including, the midnight after `last`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use stockroom_core::DateRange;
    ///
    /// let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// let range = DateRange::days(day, day).unwrap();
    /// assert_eq!(range.start().to_rfc3339(), "2026-03-01T00:00:00+00:00");
    /// assert_eq!(range.end().to_rfc3339(), "2026-03-02T00:00:00+00:00");
    /// ```
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self, ValidationError> {
        if last < first {
            return Err(ValidationError::InvertedRange {
                start: first.to_string(),
                end: last.to_string(),
            });
        }
        let after_last = last.succ_opt().ok_or_else(|| ValidationError::OutOfRange {
            field: "date".to_string(),
            min: i64::from(NaiveDate::MIN.year()),
            max: i64::from(NaiveDate::MAX.year()),
        })?;

        let midnight = |day: NaiveDate| Utc.from_utc_datetime(&day.and_time(NaiveTime::default()));
        DateRange::new(midnight(first), midnight(after_last))
    }

    /// First instant inside the window.
    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// First instant past the window.
    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    fn widget(stock: i64, reorder: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            sku: None,
            description: None,
            price_cents: 250,
            current_stock: stock,
            reorder_level: reorder,
            supplier_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_low_stock_is_strictly_below() {
        assert!(!widget(6, 5).is_low_stock());
        assert!(!widget(5, 5).is_low_stock());
        assert!(widget(4, 5).is_low_stock());
        assert!(!widget(0, 0).is_low_stock());
    }

    #[test]
    fn test_product_label_prefers_sku() {
        let mut p = widget(1, 0);
        assert_eq!(p.label(), "Widget");
        p.sku = Some("WID-1".to_string());
        assert_eq!(p.label(), "WID-1");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());
        let update = ProductUpdate {
            description: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(SupplierUpdate::default().is_empty());
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let a = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(DateRange::new(a, b).is_err());
        assert!(DateRange::new(b, a).is_ok());
        assert!(DateRange::new(a, a).is_ok());
    }

    #[test]
    fn test_date_range_days_ends_at_next_midnight() {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let range = DateRange::days(first, last).unwrap();

        assert_eq!(range.start(), Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end(), Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap());

        let last_tick = Utc
            .with_ymd_and_hms(2026, 3, 2, 23, 59, 59)
            .unwrap()
            .with_nanosecond(999_999_999)
            .unwrap();
        assert!(last_tick < range.end());

        assert!(matches!(
            DateRange::days(last, first),
            Err(ValidationError::InvertedRange { .. })
        ));
        assert!(DateRange::days(NaiveDate::MAX, NaiveDate::MAX).is_err());
    }

    #[test]
    fn test_sale_serializes() {
        let sale = Sale {
            id: "s-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 2,
            unit_price_cents: 250,
            total_cents: 500,
            sold_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            customer_name: None,
            notes: None,
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["total_cents"], 500);
        assert_eq!(sale.total().cents(), 500);
    }
}
