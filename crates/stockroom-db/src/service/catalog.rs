//! Product and supplier maintenance.
//!
//! Stock is never written here; a new product's opening stock is the only
//! stock value set outside a posting.

use chrono::Utc;
use tracing::info;

use stockroom_core::validation::{
    normalize_optional, validate_amount, validate_email, validate_opening_stock,
    validate_product_name, validate_reorder_level, validate_search_query, validate_sku,
    validate_supplier_name,
};
use stockroom_core::{
    NewProduct, NewSupplier, Product, ProductUpdate, Supplier, SupplierUpdate, ValidationError,
};

use super::{InventoryService, ServiceError, ServiceResult, SEARCH_LIMIT};
use crate::error::DbError;
use crate::repository::generate_id;

fn duplicate(field: &str, value: &str) -> ServiceError {
    ServiceError::Validation(ValidationError::Duplicate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Trims and checks an optional SKU; blank means none.
fn clean_sku(sku: Option<String>) -> Result<Option<String>, ValidationError> {
    let sku = normalize_optional(sku);
    if let Some(sku) = &sku {
        validate_sku(sku)?;
    }
    Ok(sku)
}

/// Trims and checks an optional e-mail; blank means none.
fn clean_email(email: Option<String>) -> Result<Option<String>, ValidationError> {
    let email = normalize_optional(email);
    if let Some(email) = &email {
        validate_email(email)?;
    }
    Ok(email)
}

impl InventoryService {
    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product with its opening stock.
    ///
    /// ## Errors
    /// - `Validation` - bad field, duplicate name or SKU
    /// - `NotFound` - supplier given but missing
    pub async fn add_product(&self, input: NewProduct) -> ServiceResult<Product> {
        let name = input.name.trim().to_string();
        validate_product_name(&name)?;
        let sku = clean_sku(input.sku)?;
        validate_amount("price", input.price)?;
        validate_reorder_level(input.reorder_level)?;
        validate_opening_stock(input.opening_stock)?;

        let supplier_id = normalize_optional(input.supplier_id);
        self.ensure_supplier(supplier_id.as_deref()).await?;

        let products = self.db.products();
        if products.get_by_name(&name).await?.is_some() {
            return Err(duplicate("name", &name));
        }
        if let Some(sku) = &sku {
            if products.get_by_sku(sku).await?.is_some() {
                return Err(duplicate("sku", sku));
            }
        }

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name,
            sku,
            description: normalize_optional(input.description),
            price_cents: input.price.cents(),
            current_stock: input.opening_stock,
            reorder_level: input.reorder_level,
            supplier_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let product = products.insert(&product).await?;
        info!(id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Applies a partial update to a product's editable fields.
    pub async fn update_product(&self, id: &str, update: ProductUpdate) -> ServiceResult<Product> {
        let products = self.db.products();
        let mut product = self.get_product(id).await?;

        if update.is_empty() {
            return Ok(product);
        }

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            validate_product_name(&name)?;
            if let Some(other) = products.get_by_name(&name).await? {
                if other.id != product.id {
                    return Err(duplicate("name", &name));
                }
            }
            product.name = name;
        }

        if let Some(sku) = update.sku {
            let sku = clean_sku(sku)?;
            if let Some(sku) = &sku {
                if let Some(other) = products.get_by_sku(sku).await? {
                    if other.id != product.id {
                        return Err(duplicate("sku", sku));
                    }
                }
            }
            product.sku = sku;
        }

        if let Some(description) = update.description {
            product.description = normalize_optional(description);
        }

        if let Some(price) = update.price {
            validate_amount("price", price)?;
            product.price_cents = price.cents();
        }

        if let Some(level) = update.reorder_level {
            validate_reorder_level(level)?;
            product.reorder_level = level;
        }

        if let Some(supplier_id) = update.supplier_id {
            let supplier_id = normalize_optional(supplier_id);
            self.ensure_supplier(supplier_id.as_deref()).await?;
            product.supplier_id = supplier_id;
        }

        products.update(&product).await?;
        info!(id = %product.id, "Product updated");

        self.get_product(id).await
    }

    /// Soft delete: hidden from listings and refused by postings, history
    /// kept.
    pub async fn deactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db.products().set_active(id, false).await?;
        info!(id = %id, "Product deactivated");
        Ok(())
    }

    /// Undoes [`InventoryService::deactivate_product`].
    pub async fn reactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db.products().set_active(id, true).await?;
        info!(id = %id, "Product reactivated");
        Ok(())
    }

    /// Hard delete, only for products no purchase or sale refers to.
    ///
    /// ## Errors
    /// - `InUse` - ledger rows reference the product
    pub async fn delete_product(&self, id: &str) -> ServiceResult<()> {
        let products = self.db.products();
        let product = self.get_product(id).await?;

        let references = products.ledger_reference_count(&product.id).await?;
        if references > 0 {
            return Err(ServiceError::InUse {
                entity: "Product".to_string(),
                id: product.label().to_string(),
                references,
            });
        }

        products.delete(&product.id).await.map_err(|e| match e {
            // The schema's RESTRICT rule caught a ledger row written since the count.
            DbError::ForeignKeyViolation { .. } => ServiceError::InUse {
                entity: "Product".to_string(),
                id: product.label().to_string(),
                references: 1,
            },
            other => other.into(),
        })?;

        info!(id = %product.id, name = %product.name, "Product deleted");
        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> ServiceResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Resolves an id, SKU or exact name.
    pub async fn find_product(&self, token: &str) -> ServiceResult<Product> {
        self.db
            .products()
            .find(token)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", token.trim()))
    }

    /// Lists products by name.
    pub async fn list_products(&self, include_inactive: bool) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list(include_inactive).await?)
    }

    /// Case-insensitive substring search over active products' names and
    /// SKUs.
    pub async fn search_products(&self, query: &str) -> ServiceResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        Ok(self.db.products().search(&query, SEARCH_LIMIT).await?)
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    async fn ensure_supplier(&self, id: Option<&str>) -> ServiceResult<()> {
        if let Some(id) = id {
            self.get_supplier(id).await?;
        }
        Ok(())
    }

    /// Creates a supplier.
    pub async fn add_supplier(&self, input: NewSupplier) -> ServiceResult<Supplier> {
        let name = input.name.trim().to_string();
        validate_supplier_name(&name)?;
        let email = clean_email(input.email)?;

        let suppliers = self.db.suppliers();
        if suppliers.get_by_name(&name).await?.is_some() {
            return Err(duplicate("supplier name", &name));
        }

        let supplier = Supplier {
            id: generate_id(),
            name,
            contact_name: normalize_optional(input.contact_name),
            phone: normalize_optional(input.phone),
            email,
            address: normalize_optional(input.address),
            created_at: Utc::now(),
        };

        let supplier = suppliers.insert(&supplier).await?;
        info!(id = %supplier.id, name = %supplier.name, "Supplier added");
        Ok(supplier)
    }

    /// Applies a partial update to a supplier.
    pub async fn update_supplier(&self, id: &str, update: SupplierUpdate) -> ServiceResult<Supplier> {
        let suppliers = self.db.suppliers();
        let mut supplier = self.get_supplier(id).await?;

        if update.is_empty() {
            return Ok(supplier);
        }

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            validate_supplier_name(&name)?;
            if let Some(other) = suppliers.get_by_name(&name).await? {
                if other.id != supplier.id {
                    return Err(duplicate("supplier name", &name));
                }
            }
            supplier.name = name;
        }
        if let Some(contact_name) = update.contact_name {
            supplier.contact_name = normalize_optional(contact_name);
        }
        if let Some(phone) = update.phone {
            supplier.phone = normalize_optional(phone);
        }
        if let Some(email) = update.email {
            supplier.email = clean_email(email)?;
        }
        if let Some(address) = update.address {
            supplier.address = normalize_optional(address);
        }

        suppliers.update(&supplier).await?;
        info!(id = %supplier.id, "Supplier updated");
        Ok(supplier)
    }

    /// Deletes a supplier. Products and purchases that referenced it keep
    /// existing with no supplier.
    pub async fn delete_supplier(&self, id: &str) -> ServiceResult<()> {
        self.db.suppliers().delete(id).await?;
        info!(id = %id, "Supplier deleted");
        Ok(())
    }

    /// Gets a supplier by ID.
    pub async fn get_supplier(&self, id: &str) -> ServiceResult<Supplier> {
        self.db
            .suppliers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))
    }

    /// Resolves an id or exact name.
    pub async fn find_supplier(&self, token: &str) -> ServiceResult<Supplier> {
        self.db
            .suppliers()
            .find(token)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", token.trim()))
    }

    /// Lists suppliers by name.
    pub async fn list_suppliers(&self) -> ServiceResult<Vec<Supplier>> {
        Ok(self.db.suppliers().list().await?)
    }
}

#[cfg(test)]
mod tests {
    use stockroom_core::{Money, NewPurchase, NewSale};

    use super::*;
    use crate::service::test_support::{add_widget, service};
    use crate::service::ErrorKind;

    #[tokio::test]
    async fn test_add_product_validates_and_trims() {
        let service = service().await;

        let product = service
            .add_product(NewProduct {
                name: "  Widget ".to_string(),
                sku: Some(" WID-1 ".to_string()),
                description: Some("".to_string()),
                price: Money::from_cents(250),
                reorder_level: 5,
                opening_stock: 10,
                supplier_id: None,
            })
            .await
            .unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.sku.as_deref(), Some("WID-1"));
        assert_eq!(product.description, None);
        assert_eq!(product.current_stock, 10);

        for bad in [
            NewProduct { name: "".to_string(), ..Default::default() },
            NewProduct { name: "X".to_string(), opening_stock: -1, ..Default::default() },
            NewProduct { name: "X".to_string(), reorder_level: -1, ..Default::default() },
            NewProduct { name: "X".to_string(), price: Money::from_cents(-1), ..Default::default() },
            NewProduct { name: "X".to_string(), sku: Some("bad sku".to_string()), ..Default::default() },
        ] {
            let err = service.add_product(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(service.list_products(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_rejects_duplicates() {
        let service = service().await;
        service
            .add_product(NewProduct {
                name: "Widget".to_string(),
                sku: Some("WID-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = service
            .add_product(NewProduct {
                name: "Widget".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::Duplicate { ref field, .. }) if field == "name"
        ));

        let err = service
            .add_product(NewProduct {
                name: "Gadget".to_string(),
                sku: Some("WID-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::Duplicate { ref field, .. }) if field == "sku"
        ));
    }

    #[tokio::test]
    async fn test_add_product_with_missing_supplier() {
        let service = service().await;
        let err = service
            .add_product(NewProduct {
                name: "Widget".to_string(),
                supplier_id: Some("nobody".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_product_partial() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 5).await;
        add_widget(&service, "Gadget", 1, 0).await;

        let updated = service
            .update_product(
                &widget.id,
                ProductUpdate {
                    sku: Some(Some("WID-9".to_string())),
                    price: Some(Money::from_cents(300)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.sku.as_deref(), Some("WID-9"));
        assert_eq!(updated.price_cents, 300);
        assert_eq!(updated.current_stock, 10);

        let cleared = service
            .update_product(
                &widget.id,
                ProductUpdate {
                    sku: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.sku, None);

        let err = service
            .update_product(
                &widget.id,
                ProductUpdate {
                    name: Some("Gadget".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // Renaming to its own name is not a duplicate.
        service
            .update_product(
                &widget.id,
                ProductUpdate {
                    name: Some("Widget".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service
            .update_product("missing", ProductUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_find_product_by_any_key() {
        let service = service().await;
        let widget = service
            .add_product(NewProduct {
                name: "Widget".to_string(),
                sku: Some("WID-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        for token in [widget.id.as_str(), "WID-1", "Widget", " Widget "] {
            assert_eq!(service.find_product(token).await.unwrap().id, widget.id);
        }
        assert_eq!(
            service.find_product("nothing").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_search_products() {
        let service = service().await;
        add_widget(&service, "Blue Widget", 1, 0).await;
        add_widget(&service, "Red Widget", 1, 0).await;
        add_widget(&service, "Gadget", 1, 0).await;

        assert_eq!(service.search_products("WIDGET").await.unwrap().len(), 2);
        assert_eq!(service.search_products("").await.unwrap().len(), 3);
        assert!(service.search_products(&"x".repeat(101)).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_product_blocked_by_ledger() {
        let service = service().await;
        let used = add_widget(&service, "Widget", 10, 0).await;
        let unused = add_widget(&service, "Gadget", 0, 0).await;

        service
            .record_sale(NewSale {
                product_id: used.id.clone(),
                quantity: 1,
                ..Default::default()
            })
            .await
            .unwrap();

        let err = service.delete_product(&used.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InUse { references: 1, .. }));
        assert!(service.get_product(&used.id).await.is_ok());

        // Soft delete is the way out.
        service.deactivate_product(&used.id).await.unwrap();
        assert!(!service.get_product(&used.id).await.unwrap().is_active);
        assert_eq!(service.list_products(false).await.unwrap().len(), 1);

        service.reactivate_product(&used.id).await.unwrap();
        assert!(service.get_product(&used.id).await.unwrap().is_active);

        service.delete_product(&unused.id).await.unwrap();
        assert_eq!(
            service.get_product(&unused.id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_supplier_lifecycle_clears_references() {
        let service = service().await;
        let acme = service
            .add_supplier(NewSupplier {
                name: "Acme".to_string(),
                email: Some("orders@acme.example".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let widget = service
            .add_product(NewProduct {
                name: "Widget".to_string(),
                supplier_id: Some(acme.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        let posting = service
            .record_purchase(NewPurchase {
                product_id: widget.id.clone(),
                supplier_id: Some(acme.id.clone()),
                quantity: 3,
                unit_cost: Money::from_cents(100),
                ..Default::default()
            })
            .await
            .unwrap();

        let renamed = service
            .update_supplier(
                &acme.id,
                SupplierUpdate {
                    name: Some("Acme Ltd".to_string()),
                    phone: Some(Some("555-0100".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Acme Ltd");
        assert_eq!(service.find_supplier("Acme Ltd").await.unwrap().id, acme.id);

        service.delete_supplier(&acme.id).await.unwrap();

        assert_eq!(service.get_product(&widget.id).await.unwrap().supplier_id, None);
        let stored = service
            .database()
            .purchases()
            .get_by_id(&posting.record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.supplier_id, None);
        assert_eq!(stored.quantity, 3);
        assert!(service.list_suppliers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_supplier_validation() {
        let service = service().await;
        service
            .add_supplier(NewSupplier {
                name: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        for bad in [
            NewSupplier { name: " ".to_string(), ..Default::default() },
            NewSupplier { name: "Acme".to_string(), ..Default::default() },
            NewSupplier {
                name: "Other".to_string(),
                email: Some("not-an-email".to_string()),
                ..Default::default()
            },
        ] {
            let err = service.add_supplier(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        assert_eq!(
            service.delete_supplier("missing").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
