//! # CSV Export
//!
//! Flat CSV renderings of listings and reports.
//!
//! Every file starts with a header row, also when there is no data.
//! Amounts are written as plain decimals (`10.99`) without a currency
//! symbol so spreadsheets read them as numbers.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use stockroom_core::{Money, Product, PurchaseLine, SaleLine, SalesSummary, StockLevel};
use tracing::info;

use crate::error::CliResult;

/// A CSV line type with a fixed header.
pub trait ExportRow: Serialize {
    const HEADERS: &'static [&'static str];
}

fn amount(cents: i64) -> String {
    Money::from_cents(cents).to_string()
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ProductRow {
    id: String,
    name: String,
    sku: String,
    description: String,
    price: String,
    stock: i64,
    reorder_level: i64,
    active: bool,
}

impl ExportRow for ProductRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "sku",
        "description",
        "price",
        "stock",
        "reorder_level",
        "active",
    ];
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        ProductRow {
            id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone().unwrap_or_default(),
            description: p.description.clone().unwrap_or_default(),
            price: amount(p.price_cents),
            stock: p.current_stock,
            reorder_level: p.reorder_level,
            active: p.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockRow {
    product_id: String,
    name: String,
    sku: String,
    price: String,
    stock: i64,
    reorder_level: i64,
    low: bool,
}

impl ExportRow for StockRow {
    const HEADERS: &'static [&'static str] = &[
        "product_id",
        "name",
        "sku",
        "price",
        "stock",
        "reorder_level",
        "low",
    ];
}

impl From<&StockLevel> for StockRow {
    fn from(s: &StockLevel) -> Self {
        StockRow {
            product_id: s.product_id.clone(),
            name: s.name.clone(),
            sku: s.sku.clone().unwrap_or_default(),
            price: amount(s.price_cents),
            stock: s.current_stock,
            reorder_level: s.reorder_level,
            low: s.is_low(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalesSummaryRow {
    product_id: String,
    product: String,
    quantity: i64,
    revenue: String,
}

impl ExportRow for SalesSummaryRow {
    const HEADERS: &'static [&'static str] = &["product_id", "product", "quantity", "revenue"];
}

impl From<&SalesSummary> for SalesSummaryRow {
    fn from(s: &SalesSummary) -> Self {
        SalesSummaryRow {
            product_id: s.product_id.clone(),
            product: s.product_name.clone(),
            quantity: s.total_quantity,
            revenue: amount(s.total_revenue_cents),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleRow {
    id: String,
    sold_at: String,
    product: String,
    quantity: i64,
    unit_price: String,
    total: String,
    customer: String,
    notes: String,
}

impl ExportRow for SaleRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "sold_at",
        "product",
        "quantity",
        "unit_price",
        "total",
        "customer",
        "notes",
    ];
}

impl From<&SaleLine> for SaleRow {
    fn from(s: &SaleLine) -> Self {
        SaleRow {
            id: s.id.clone(),
            sold_at: s.sold_at.to_rfc3339(),
            product: s.product_name.clone(),
            quantity: s.quantity,
            unit_price: amount(s.unit_price_cents),
            total: amount(s.total_cents),
            customer: s.customer_name.clone().unwrap_or_default(),
            notes: s.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PurchaseRow {
    id: String,
    purchased_at: String,
    product: String,
    supplier: String,
    quantity: i64,
    unit_cost: String,
    total: String,
}

impl ExportRow for PurchaseRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "purchased_at",
        "product",
        "supplier",
        "quantity",
        "unit_cost",
        "total",
    ];
}

impl From<&PurchaseLine> for PurchaseRow {
    fn from(p: &PurchaseLine) -> Self {
        PurchaseRow {
            id: p.id.clone(),
            purchased_at: p.purchased_at.to_rfc3339(),
            product: p.product_name.clone(),
            supplier: p.supplier_name.clone().unwrap_or_default(),
            quantity: p.quantity,
            unit_cost: amount(p.unit_cost_cents),
            total: amount(p.total_cents),
        }
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Writes the header and every row to `writer`. Returns the row count.
pub fn write_csv<W: Write, R: ExportRow>(writer: W, rows: &[R]) -> CliResult<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(R::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(rows.len())
}

/// Writes rows to a file, creating parent directories.
pub fn write_csv_file<R: ExportRow>(path: &Path, rows: &[R]) -> CliResult<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let count = write_csv(file, rows)?;

    info!(path = %path.display(), rows = count, "CSV export written");
    Ok(count)
}

/// `<dir>/<report>_<YYYYMMDD>.csv`
pub fn default_export_path(dir: &Path, report: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_{}.csv", report, date.format("%Y%m%d")))
}
