//! # Report Repository
//!
//! Read-only aggregate queries. Nothing here writes, so these go straight
//! to the pool without a transaction.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Reports                                        │
//! │                                                                         │
//! │  stock_levels()        every active product, by name                   │
//! │  low_stock()           active products with stock < reorder level      │
//! │  sales_summary(range)  per product: Σ quantity, Σ revenue              │
//! │                        ordered by revenue, highest first               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{DateRange, SalesSummary, StockLevel};

const SELECT_STOCK_LEVEL: &str = r#"
    SELECT
        id AS product_id,
        name,
        sku,
        price_cents,
        current_stock,
        reorder_level
    FROM products
"#;

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Stock snapshot of all active products.
    pub async fn stock_levels(&self) -> DbResult<Vec<StockLevel>> {
        let sql = format!("{SELECT_STOCK_LEVEL} WHERE is_active = 1 ORDER BY name");
        let rows = sqlx::query_as::<_, StockLevel>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Active products whose stock is strictly below their reorder level.
    ///
    /// The furthest below threshold come first.
    pub async fn low_stock(&self) -> DbResult<Vec<StockLevel>> {
        let sql = format!(
            r#"{SELECT_STOCK_LEVEL}
            WHERE is_active = 1 AND current_stock < reorder_level
            ORDER BY reorder_level - current_stock DESC, name"#
        );
        let rows = sqlx::query_as::<_, StockLevel>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Low stock products");
        Ok(rows)
    }

    /// Quantity and revenue per product, highest revenue first.
    ///
    /// With a range only sales inside it count. Products with
    /// no sales in scope are left out.
    pub async fn sales_summary(&self, range: Option<&DateRange>) -> DbResult<Vec<SalesSummary>> {
        let rows = sqlx::query_as::<_, SalesSummary>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                SUM(sa.quantity) AS total_quantity,
                SUM(sa.total_cents) AS total_revenue_cents
            FROM sales sa
            INNER JOIN products p ON p.id = sa.product_id
            WHERE (?1 IS NULL OR sa.sold_at >= ?1)
              AND (?2 IS NULL OR sa.sold_at < ?2)
            GROUP BY p.id, p.name
            ORDER BY total_revenue_cents DESC, p.name
            "#,
        )
        .bind(range.map(DateRange::start))
        .bind(range.map(DateRange::end))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
