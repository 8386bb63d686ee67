//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Lookup by id, SKU or name, and case-insensitive search
//! - CRUD for the editable fields
//! - Stock mutation (crate-private, transaction only)
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, compute, write back                                   │
//! │     SELECT current_stock ...; UPDATE products SET current_stock = 7    │
//! │                                                                         │
//! │  ✅ CORRECT: delta update, guarded in the same statement               │
//! │     UPDATE products SET current_stock = current_stock - 3              │
//! │     WHERE id = ? AND current_stock >= 3                                │
//! │     RETURNING current_stock                                            │
//! │                                                                         │
//! │  No row back means the shelf did not hold enough, and nothing changed. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::like_pattern;
use stockroom_core::Product;

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        name,
        sku,
        description,
        price_cents,
        current_stock,
        reorder_level,
        supplier_id,
        is_active,
        created_at,
        updated_at
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search("wid", 20).await?;
/// let product = repo.find("WID-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU (exact match).
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE sku = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its name (exact match).
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE name = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Resolves whatever the user typed: an id, then a SKU, then a name.
    pub async fn find(&self, token: &str) -> DbResult<Option<Product>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        if let Some(product) = self.get_by_id(token).await? {
            return Ok(Some(product));
        }
        if let Some(product) = self.get_by_sku(token).await? {
            return Ok(Some(product));
        }
        self.get_by_name(token).await
    }

    /// Lists products sorted by name.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE (?1 OR is_active = 1) ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Searches active products by case-insensitive substring of name or
    /// SKU.
    ///
    /// An empty query lists active products.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        let sql = format!(
            r#"{SELECT_PRODUCT}
            WHERE is_active = 1
              AND (name LIKE ?1 ESCAPE '\' OR sku LIKE ?1 ESCAPE '\')
            ORDER BY name
            LIMIT ?2"#
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(like_pattern(query))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Number of purchase and sale rows referring to the product.
    pub async fn ledger_reference_count(&self, id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM purchases WHERE product_id = ?1) +
                (SELECT COUNT(*) FROM sales WHERE product_id = ?1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - name or SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(name = %product.name, sku = ?product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, description,
                price_cents, current_stock, reorder_level,
                supplier_id, is_active, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.current_stock)
        .bind(product.reorder_level)
        .bind(&product.supplier_id)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Writes the editable fields of `product` back.
    ///
    /// `current_stock` and `is_active` are not touched.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                sku = ?3,
                description = ?4,
                price_cents = ?5,
                reorder_level = ?6,
                supplier_id = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.reorder_level)
        .bind(&product.supplier_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Updates only the reorder level.
    pub async fn set_reorder_level(&self, id: &str, level: i64) -> DbResult<()> {
        debug!(id = %id, level = %level, "Setting reorder level");

        let result = sqlx::query(
            "UPDATE products SET reorder_level = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(level)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes or restores a product.
    ///
    /// Inactive products stay in reports of past sales but are hidden from
    /// default listings and refused by postings.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id = %id, active = %active, "Setting product active flag");

        let result =
            sqlx::query("UPDATE products SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(active)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Hard-deletes a product.
    ///
    /// Fails with `ForeignKeyViolation` while ledger rows reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transaction-scoped access (postings only)
    // =========================================================================

    /// Loads a product on the posting transaction's connection.
    pub(crate) async fn fetch_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(product)
    }

    /// Adds `quantity` to the stock and returns the new value.
    pub(crate) async fn increase_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<i64> {
        debug!(id = %id, quantity = %quantity, "Increasing stock");

        let new_stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET current_stock = current_stock + ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING current_stock
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?;

        new_stock.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Removes `quantity` from the stock if at least that much is on hand.
    ///
    /// Returns the new stock, or `None` when the guard failed and nothing
    /// was changed.
    pub(crate) async fn decrease_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<Option<i64>> {
        debug!(id = %id, quantity = %quantity, "Decreasing stock");

        let new_stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET current_stock = current_stock - ?2, updated_at = ?3
            WHERE id = ?1 AND current_stock >= ?2
            RETURNING current_stock
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?;

        Ok(new_stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::generate_id;
    use crate::{Database, DbConfig};

    fn product(name: &str, sku: Option<&str>, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_id(),
            name: name.to_string(),
            sku: sku.map(str::to_string),
            description: None,
            price_cents: 250,
            current_stock: stock,
            reorder_level: 5,
            supplier_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn repo() -> (Database, ProductRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        (db, repo)
    }

    #[tokio::test]
    async fn test_insert_and_find_by_each_key() {
        let (_db, repo) = repo().await;
        let widget = repo.insert(&product("Widget", Some("WID-1"), 10)).await.unwrap();

        assert_eq!(repo.find(&widget.id).await.unwrap().unwrap().id, widget.id);
        assert_eq!(repo.find("WID-1").await.unwrap().unwrap().id, widget.id);
        assert_eq!(repo.find("Widget").await.unwrap().unwrap().id, widget.id);
        assert!(repo.find("Gadget").await.unwrap().is_none());
        assert!(repo.find("  ").await.unwrap().is_none());

        let stored = repo.get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(stored.current_stock, 10);
        assert!(stored.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_unique_violation() {
        let (_db, repo) = repo().await;
        repo.insert(&product("Widget", Some("WID-1"), 0)).await.unwrap();

        let err = repo
            .insert(&product("Other", Some("WID-1"), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "sku"));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_skips_inactive() {
        let (_db, repo) = repo().await;
        let widget = repo.insert(&product("Blue Widget", Some("WID-1"), 0)).await.unwrap();
        repo.insert(&product("Gadget", Some("GAD-1"), 0)).await.unwrap();

        let hits = repo.search("widget", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, widget.id);

        assert_eq!(repo.search("gad-", 20).await.unwrap().len(), 1);
        assert_eq!(repo.search("", 20).await.unwrap().len(), 2);
        assert!(repo.search("%", 20).await.unwrap().is_empty());

        repo.set_active(&widget.id, false).await.unwrap();
        assert!(repo.search("widget", 20).await.unwrap().is_empty());
        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stock_mutators() {
        let (db, repo) = repo().await;
        let widget = repo.insert(&product("Widget", None, 10)).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let after = ProductRepository::increase_stock(&mut tx, &widget.id, 5)
            .await
            .unwrap();
        assert_eq!(after, 15);

        let after = ProductRepository::decrease_stock(&mut tx, &widget.id, 15)
            .await
            .unwrap();
        assert_eq!(after, Some(0));

        let refused = ProductRepository::decrease_stock(&mut tx, &widget.id, 1)
            .await
            .unwrap();
        assert_eq!(refused, None);
        tx.commit().await.unwrap();

        assert_eq!(repo.get_by_id(&widget.id).await.unwrap().unwrap().current_stock, 0);
    }

    #[tokio::test]
    async fn test_update_leaves_stock_alone() {
        let (_db, repo) = repo().await;
        let mut widget = repo.insert(&product("Widget", None, 7)).await.unwrap();

        widget.name = "Widget XL".to_string();
        widget.current_stock = 999;
        repo.update(&widget).await.unwrap();

        let stored = repo.get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Widget XL");
        assert_eq!(stored.current_stock, 7);
    }

    #[tokio::test]
    async fn test_missing_product_writes_are_not_found() {
        let (_db, repo) = repo().await;
        assert!(matches!(
            repo.set_reorder_level("nope", 1).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(repo.delete("nope").await, Err(DbError::NotFound { .. })));
    }
}
