//! # Stock Rules
//!
//! The arithmetic a posting applies to a product's stock counter.
//!
//! ```text
//! purchase: stock_after = stock_before + quantity
//! sale:     stock_after = stock_before − quantity   (must stay ≥ 0)
//! low:      stock < reorder_level
//! ```
//!
//! The database layer runs these checks inside the same transaction that
//! writes the new stock, so the numbers here are the ones that get stored.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_quantity;

/// True when stock has fallen strictly below the reorder level.
#[inline]
pub fn is_low(current_stock: i64, reorder_level: i64) -> bool {
    current_stock < reorder_level
}

/// Stock after receiving `quantity` units.
pub fn receive(current_stock: i64, quantity: i64) -> CoreResult<i64> {
    validate_quantity(quantity)?;
    current_stock.checked_add(quantity).ok_or_else(|| {
        CoreError::Validation(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        })
    })
}

/// Stock after issuing `quantity` units.
///
/// ## Errors
/// - `Validation` when `quantity <= 0`
/// - `InsufficientStock` when `quantity > current_stock`
pub fn issue(label: &str, current_stock: i64, quantity: i64) -> CoreResult<i64> {
    validate_quantity(quantity)?;
    if quantity > current_stock {
        return Err(CoreError::InsufficientStock {
            sku: label.to_string(),
            available: current_stock,
            requested: quantity,
        });
    }
    Ok(current_stock - quantity)
}

/// Ledger line total: `quantity × unit amount`.
#[inline]
pub fn line_total(unit: Money, quantity: i64) -> Money {
    unit.multiply_quantity(quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_adds_quantity() {
        assert_eq!(receive(4, 20).unwrap(), 24);
        assert_eq!(receive(0, 1).unwrap(), 1);
    }

    #[test]
    fn test_receive_rejects_non_positive() {
        assert!(matches!(receive(4, 0), Err(CoreError::Validation(_))));
        assert!(matches!(receive(4, -3), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_receive_overflow_is_an_error() {
        assert!(receive(i64::MAX - 1, 5).is_err());
    }

    #[test]
    fn test_issue_subtracts_quantity() {
        assert_eq!(issue("W", 10, 4).unwrap(), 6);
        assert_eq!(issue("W", 6, 6).unwrap(), 0);
    }

    #[test]
    fn test_issue_never_goes_negative() {
        match issue("WIDGET", 4, 100) {
            Err(CoreError::InsufficientStock {
                sku,
                available,
                requested,
            }) => {
                assert_eq!(sku, "WIDGET");
                assert_eq!(available, 4);
                assert_eq!(requested, 100);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_issue_validates_before_stock_check() {
        assert!(matches!(issue("W", 0, 0), Err(CoreError::Validation(_))));
        assert!(matches!(issue("W", 5, -1), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_widget_scenario() {
        // Starts at 10 with reorder level 5.
        let reorder = 5;
        let stock = issue("WIDGET", 10, 4).unwrap();
        assert_eq!(stock, 6);
        assert!(!is_low(stock, reorder));

        let stock = issue("WIDGET", stock, 2).unwrap();
        assert_eq!(stock, 4);
        assert!(is_low(stock, reorder));

        let stock = receive(stock, 20).unwrap();
        assert_eq!(stock, 24);
        assert!(!is_low(stock, reorder));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Money::from_cents(299), 3).cents(), 897);
        assert_eq!(line_total(Money::zero(), 50).cents(), 0);
    }
}
