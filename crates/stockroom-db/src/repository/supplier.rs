//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! Deleting a supplier never fails because of references: the schema
//! declares `ON DELETE SET NULL` on both `products.supplier_id` and
//! `purchases.supplier_id`, so those rows simply lose the link.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::Supplier;

const SELECT_SUPPLIER: &str = r#"
    SELECT id, name, contact_name, phone, email, address, created_at
    FROM suppliers
"#;

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Gets a supplier by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let sql = format!("{SELECT_SUPPLIER} WHERE id = ?1");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Gets a supplier by name (exact match).
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Supplier>> {
        let sql = format!("{SELECT_SUPPLIER} WHERE name = ?1");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Resolves an id or a name.
    pub async fn find(&self, token: &str) -> DbResult<Option<Supplier>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        match self.get_by_id(token).await? {
            Some(supplier) => Ok(Some(supplier)),
            None => self.get_by_name(token).await,
        }
    }

    /// Lists all suppliers sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!("{SELECT_SUPPLIER} ORDER BY name");
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(suppliers)
    }

    /// Inserts a new supplier.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already exists
    pub async fn insert(&self, supplier: &Supplier) -> DbResult<Supplier> {
        debug!(name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, contact_name, phone, email, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier.clone())
    }

    /// Writes every field except `id` and `created_at` back.
    pub async fn update(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(id = %supplier.id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                contact_name = ?3,
                phone = ?4,
                email = ?5,
                address = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", &supplier.id));
        }

        Ok(())
    }

    /// Deletes a supplier, clearing references from products and purchases.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }

    /// Loads a supplier on the posting transaction's connection.
    pub(crate) async fn fetch_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Supplier>> {
        let sql = format!("{SELECT_SUPPLIER} WHERE id = ?1");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(supplier)
    }

}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repository::generate_id;
    use crate::{Database, DbConfig};

    fn acme() -> Supplier {
        Supplier {
            id: generate_id(),
            name: "Acme".to_string(),
            contact_name: Some("Ravi".to_string()),
            phone: None,
            email: Some("orders@acme.example".to_string()),
            address: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let mut supplier = repo.insert(&acme()).await.unwrap();
        assert_eq!(repo.find("Acme").await.unwrap().unwrap().id, supplier.id);
        assert_eq!(repo.find(&supplier.id).await.unwrap().unwrap().name, "Acme");

        supplier.phone = Some("555-0100".to_string());
        repo.update(&supplier).await.unwrap();
        let stored = repo.get_by_id(&supplier.id).await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("555-0100"));

        assert!(matches!(
            repo.insert(&acme()).await,
            Err(DbError::UniqueViolation { .. })
        ));

        repo.delete(&supplier.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(&supplier.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
