//! # Input Rules
//!
//! Checks run by `InventoryService` before it opens a transaction. clap
//! has already parsed types by then; SQLite's CHECK and UNIQUE constraints
//! sit behind these as the last line.
//!
//! ```rust
//! use stockroom_core::validation::{validate_quantity, validate_sku};
//!
//! assert!(validate_sku("WID-001").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_POSTING_QUANTITY};

pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SKU_LEN: usize = 50;
const MAX_NAME_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

fn check_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::required(field))
    } else if value.chars().count() > max {
        Err(ValidationError::too_long(field, max))
    } else {
        Ok(())
    }
}

// =============================================================================
// Text
// =============================================================================

/// Letters, digits, `-` and `_`; up to 50 characters.
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    check_text("sku", sku, MAX_SKU_LEN)?;

    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '-' | '_');
    if sku.trim().chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "sku",
            "must contain only letters, numbers, hyphens, and underscores",
        ))
    }
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    check_text("name", name, MAX_NAME_LEN)
}

pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    check_text("supplier name", name, MAX_NAME_LEN)
}

/// Shape only: `local@domain.tld`, one `@`, a dot inside the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let well_formed = email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "email",
            "expected an address like name@example.com",
        ))
    }
}

/// Returns the trimmed query. An empty query lists everything.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::too_long("query", MAX_QUERY_LEN));
    }
    Ok(query.to_string())
}

/// `Some("  ")` → `None`, `Some(" Acme ")` → `Some("Acme")`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

// =============================================================================
// Numbers
// =============================================================================

/// Purchase and sale quantities: `1..=MAX_POSTING_QUANTITY`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    match qty {
        q if q <= 0 => Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }),
        q if q > MAX_POSTING_QUANTITY => Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_POSTING_QUANTITY,
        }),
        _ => Ok(()),
    }
}

/// Prices and unit costs. Zero is a valid price.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        Err(ValidationError::negative(field))
    } else if amount.cents() > MAX_AMOUNT_CENTS {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        })
    } else {
        Ok(())
    }
}

pub fn validate_reorder_level(level: i64) -> ValidationResult<()> {
    non_negative("reorder level", level)
}

pub fn validate_opening_stock(stock: i64) -> ValidationResult<()> {
    non_negative("opening stock", stock)
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        Err(ValidationError::negative(field))
    } else {
        Ok(())
    }
}
