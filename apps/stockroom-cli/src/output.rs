//! # Console Output
//!
//! Tables for humans (`tabled`), JSON for scripts (`--json`).

use serde::Serialize;
use stockroom_core::{Product, PurchaseLine, SaleLine, SalesSummary, StockLevel, Supplier};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::CliResult;
use crate::settings::Settings;

/// How listings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

/// Prints `items` as pretty JSON, or as a table of `T` built from each one.
pub fn print_rows<'a, S, T>(mode: OutputMode, items: &'a [S], to_row: impl Fn(&'a S) -> T) -> CliResult<()>
where
    S: Serialize,
    T: Tabled,
{
    match mode {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputMode::Table if items.is_empty() => println!("(no rows)"),
        OutputMode::Table => println!("{}", render(items.iter().map(to_row))),
    }
    Ok(())
}

/// Prints one record.
pub fn print_one<S: Serialize, T: Tabled>(mode: OutputMode, item: &S, row: T) -> CliResult<()> {
    match mode {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputMode::Table => println!("{}", render(std::iter::once(row))),
    }
    Ok(())
}

/// Renders rows with the house table style.
pub fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// =============================================================================
// Table Rows
// =============================================================================

#[derive(Tabled)]
pub struct ProductTable {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: i64,
    #[tabled(rename = "Reorder")]
    reorder_level: i64,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "ID")]
    id: String,
}

impl ProductTable {
    pub fn new(p: &Product, settings: &Settings) -> Self {
        let status = match (p.is_active, p.is_low_stock()) {
            (false, _) => "inactive",
            (true, true) => "LOW",
            (true, false) => "ok",
        };
        ProductTable {
            sku: opt(&p.sku),
            name: p.name.clone(),
            price: settings.format_cents(p.price_cents),
            stock: p.current_stock,
            reorder_level: p.reorder_level,
            status,
            id: p.id.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct SupplierTable {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Supplier> for SupplierTable {
    fn from(s: &Supplier) -> Self {
        SupplierTable {
            name: s.name.clone(),
            contact: opt(&s.contact_name),
            phone: opt(&s.phone),
            email: opt(&s.email),
            address: opt(&s.address),
            id: s.id.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct StockTable {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: i64,
    #[tabled(rename = "Reorder")]
    reorder_level: i64,
    #[tabled(rename = "Low")]
    low: &'static str,
}

impl StockTable {
    pub fn new(s: &StockLevel, settings: &Settings) -> Self {
        StockTable {
            sku: opt(&s.sku),
            name: s.name.clone(),
            price: settings.format_cents(s.price_cents),
            stock: s.current_stock,
            reorder_level: s.reorder_level,
            low: if s.is_low() { "yes" } else { "" },
        }
    }
}

#[derive(Tabled)]
pub struct SummaryTable {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Revenue")]
    revenue: String,
}

impl SummaryTable {
    pub fn new(s: &SalesSummary, settings: &Settings) -> Self {
        SummaryTable {
            product: s.product_name.clone(),
            quantity: s.total_quantity,
            revenue: settings.format_money(s.total_revenue()),
        }
    }
}

#[derive(Tabled)]
pub struct SaleTable {
    #[tabled(rename = "When")]
    sold_at: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Unit")]
    unit_price: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Customer")]
    customer: String,
}

impl SaleTable {
    pub fn new(s: &SaleLine, settings: &Settings) -> Self {
        SaleTable {
            sold_at: s.sold_at.format("%Y-%m-%d %H:%M").to_string(),
            product: s.product_name.clone(),
            quantity: s.quantity,
            unit_price: settings.format_cents(s.unit_price_cents),
            total: settings.format_cents(s.total_cents),
            customer: opt(&s.customer_name),
        }
    }
}

#[derive(Tabled)]
pub struct PurchaseTable {
    #[tabled(rename = "When")]
    purchased_at: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Unit cost")]
    unit_cost: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl PurchaseTable {
    pub fn new(p: &PurchaseLine, settings: &Settings) -> Self {
        PurchaseTable {
            purchased_at: p.purchased_at.format("%Y-%m-%d %H:%M").to_string(),
            product: p.product_name.clone(),
            supplier: opt(&p.supplier_name),
            quantity: p.quantity,
            unit_cost: settings.format_cents(p.unit_cost_cents),
            total: settings.format_cents(p.total_cents),
        }
    }
}

/// Key/value table for `settings show`.
#[derive(Tabled)]
pub struct SettingTable {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<(&'static str, String)> for SettingTable {
    fn from((key, value): (&'static str, String)) -> Self {
        SettingTable { key, value }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_product_table_flags_low_stock() {
        let now = Utc::now();
        let product = Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            sku: Some("WID-1".to_string()),
            description: None,
            price_cents: 123450,
            current_stock: 4,
            reorder_level: 5,
            supplier_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let out = render([ProductTable::new(&product, &Settings::default())]);
        assert!(out.contains("WID-1"));
        assert!(out.contains("₹1,234.50"));
        assert!(out.contains("LOW"));
    }
}
