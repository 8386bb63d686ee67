//! # Purchase Repository
//!
//! The purchase ledger. Rows are appended by
//! [`InventoryService::record_purchase`](crate::InventoryService::record_purchase)
//! inside its transaction and never updated or deleted afterwards.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{DateRange, Purchase, PurchaseLine};

const SELECT_PURCHASE_LINE: &str = r#"
    SELECT
        pu.id,
        pu.product_id,
        p.name AS product_name,
        pu.supplier_id,
        s.name AS supplier_name,
        pu.quantity,
        pu.unit_cost_cents,
        pu.total_cents,
        pu.purchased_at
    FROM purchases pu
    INNER JOIN products p ON p.id = pu.product_id
    LEFT JOIN suppliers s ON s.id = pu.supplier_id
"#;

/// Repository for the purchase ledger.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Appends a purchase row on the posting transaction's connection.
    pub(crate) async fn insert_in(conn: &mut SqliteConnection, purchase: &Purchase) -> DbResult<()> {
        debug!(id = %purchase.id, product_id = %purchase.product_id, "Inserting purchase");

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, product_id, supplier_id, quantity,
                unit_cost_cents, total_cents, purchased_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(&purchase.supplier_id)
        .bind(purchase.quantity)
        .bind(purchase.unit_cost_cents)
        .bind(purchase.total_cents)
        .bind(purchase.purchased_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Most recent purchases first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<PurchaseLine>> {
        let sql = format!("{SELECT_PURCHASE_LINE} ORDER BY pu.purchased_at DESC, pu.rowid DESC LIMIT ?1");
        let lines = sqlx::query_as::<_, PurchaseLine>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Purchases inside `range` (`start <= purchased_at < end`), oldest first.
    pub async fn list_between(&self, range: &DateRange) -> DbResult<Vec<PurchaseLine>> {
        debug!(start = %range.start(), end = %range.end(), "Listing purchases in range");

        let sql = format!(
            r#"{SELECT_PURCHASE_LINE}
            WHERE pu.purchased_at >= ?1 AND pu.purchased_at < ?2
            ORDER BY pu.purchased_at, pu.rowid"#
        );
        let lines = sqlx::query_as::<_, PurchaseLine>(&sql)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }
}

// Read-backs used to check postings.
#[cfg(test)]
impl PurchaseRepository {
    /// Gets a purchase by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, product_id, supplier_id, quantity, unit_cost_cents, total_cents, purchased_at
            FROM purchases
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Every purchase of one product, oldest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, product_id, supplier_id, quantity, unit_cost_cents, total_cents, purchased_at
            FROM purchases
            WHERE product_id = ?1
            ORDER BY purchased_at, rowid
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Sum of purchased quantity for one product.
    pub async fn total_quantity_for_product(&self, product_id: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM purchases WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
