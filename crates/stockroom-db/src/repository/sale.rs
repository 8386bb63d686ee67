//! # Sale Repository
//!
//! The sale ledger.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. VALIDATE (no storage touched)                                      │
//! │     └── quantity > 0, explicit unit price >= 0                         │
//! │                                                                         │
//! │  2. POST (one transaction)                                             │
//! │     └── load product → guarded stock decrement → insert_in()           │
//! │                                                                         │
//! │  3. READ                                                               │
//! │     └── list_recent() / list_between() / list_for_product()            │
//! │                                                                         │
//! │  There is no void: a posted sale is permanent.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{DateRange, Sale, SaleLine};

#[cfg(test)]
const SELECT_SALE: &str = r#"
    SELECT
        id,
        product_id,
        quantity,
        unit_price_cents,
        total_cents,
        sold_at,
        customer_name,
        notes
    FROM sales
"#;

const SELECT_SALE_LINE: &str = r#"
    SELECT
        sa.id,
        sa.product_id,
        p.name AS product_name,
        sa.quantity,
        sa.unit_price_cents,
        sa.total_cents,
        sa.sold_at,
        sa.customer_name,
        sa.notes
    FROM sales sa
    INNER JOIN products p ON p.id = sa.product_id
"#;

/// Repository for the sale ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale row on the posting transaction's connection.
    pub(crate) async fn insert_in(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, product_id = %sale.product_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, quantity, unit_price_cents,
                total_cents, sold_at, customer_name, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_cents)
        .bind(sale.sold_at)
        .bind(&sale.customer_name)
        .bind(&sale.notes)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Most recent sales first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleLine>> {
        let sql = format!("{SELECT_SALE_LINE} ORDER BY sa.sold_at DESC, sa.rowid DESC LIMIT ?1");
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Sales inside `range` (`start <= sold_at < end`), oldest first.
    pub async fn list_between(&self, range: &DateRange) -> DbResult<Vec<SaleLine>> {
        debug!(start = %range.start(), end = %range.end(), "Listing sales in range");

        let sql = format!(
            r#"{SELECT_SALE_LINE}
            WHERE sa.sold_at >= ?1 AND sa.sold_at < ?2
            ORDER BY sa.sold_at, sa.rowid"#
        );
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }
}

// Read-backs used to check postings.
#[cfg(test)]
impl SaleRepository {
    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("{SELECT_SALE} WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Every sale of one product, oldest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!("{SELECT_SALE} WHERE product_id = ?1 ORDER BY sold_at, rowid");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Sum of sold quantity for one product.
    pub async fn total_quantity_for_product(&self, product_id: &str) -> DbResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM sales WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }
}
