//! Purchase and sale postings.

use chrono::Utc;
use tracing::{debug, info};

use stockroom_core::validation::{
    normalize_optional, validate_amount, validate_quantity, validate_reorder_level,
};
use stockroom_core::{stock, NewPurchase, NewSale, Posting, Product, Purchase, Sale, ValidationError};

use super::{InventoryService, ServiceError, ServiceResult};
use crate::error::DbError;
use crate::repository::generate_id;
use crate::repository::product::ProductRepository;
use crate::repository::purchase::PurchaseRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::supplier::SupplierRepository;

/// Postings are refused for deactivated products.
fn ensure_active(product: &Product) -> Result<(), ValidationError> {
    if !product.is_active {
        return Err(ValidationError::Inactive {
            entity: "Product".to_string(),
            id: product.label().to_string(),
        });
    }
    Ok(())
}

impl InventoryService {
    /// Receives stock from a supplier.
    ///
    /// ## Errors
    /// - `Validation` - quantity <= 0, negative unit cost, inactive product
    /// - `NotFound` - product or supplier missing
    pub async fn record_purchase(&self, input: NewPurchase) -> ServiceResult<Posting<Purchase>> {
        validate_quantity(input.quantity)?;
        validate_amount("unit cost", input.unit_cost)?;

        let supplier_id = normalize_optional(input.supplier_id);

        debug!(
            product_id = %input.product_id,
            quantity = input.quantity,
            unit_cost = %input.unit_cost,
            "Recording purchase"
        );

        let mut tx = self.db.begin().await?;

        let product = ProductRepository::fetch_in(&mut tx, &input.product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", &input.product_id))?;
        ensure_active(&product)?;

        if let Some(id) = &supplier_id {
            if SupplierRepository::fetch_in(&mut tx, id).await?.is_none() {
                return Err(ServiceError::not_found("Supplier", id));
            }
        }

        let expected = stock::receive(product.current_stock, input.quantity)?;
        let new_stock = ProductRepository::increase_stock(&mut tx, &product.id, input.quantity).await?;
        debug_assert_eq!(expected, new_stock);

        let purchase = Purchase {
            id: generate_id(),
            product_id: product.id.clone(),
            supplier_id,
            quantity: input.quantity,
            unit_cost_cents: input.unit_cost.cents(),
            total_cents: stock::line_total(input.unit_cost, input.quantity).cents(),
            purchased_at: input.purchased_at.unwrap_or_else(Utc::now),
        };
        PurchaseRepository::insert_in(&mut tx, &purchase).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            product = %product.label(),
            quantity = purchase.quantity,
            new_stock,
            "Purchase recorded"
        );

        Ok(Posting {
            record: purchase,
            new_stock,
        })
    }

    /// Sells stock.
    ///
    /// The unit price defaults to the product's current price and is frozen
    /// into the sale row.
    ///
    /// ## Errors
    /// - `Validation` - quantity <= 0, negative unit price, inactive product
    /// - `NotFound` - product missing
    /// - `InsufficientStock` - quantity exceeds stock on hand; stock unchanged
    pub async fn record_sale(&self, input: NewSale) -> ServiceResult<Posting<Sale>> {
        validate_quantity(input.quantity)?;
        if let Some(price) = input.unit_price {
            validate_amount("unit price", price)?;
        }

        debug!(
            product_id = %input.product_id,
            quantity = input.quantity,
            "Recording sale"
        );

        let mut tx = self.db.begin().await?;

        let product = ProductRepository::fetch_in(&mut tx, &input.product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", &input.product_id))?;
        ensure_active(&product)?;

        stock::issue(product.label(), product.current_stock, input.quantity)?;

        let new_stock = ProductRepository::decrease_stock(&mut tx, &product.id, input.quantity)
            .await?
            .ok_or_else(|| ServiceError::InsufficientStock {
                sku: product.label().to_string(),
                available: product.current_stock,
                requested: input.quantity,
            })?;

        let unit_price = input.unit_price.unwrap_or_else(|| product.price());
        let sale = Sale {
            id: generate_id(),
            product_id: product.id.clone(),
            quantity: input.quantity,
            unit_price_cents: unit_price.cents(),
            total_cents: stock::line_total(unit_price, input.quantity).cents(),
            sold_at: input.sold_at.unwrap_or_else(Utc::now),
            customer_name: normalize_optional(input.customer_name),
            notes: normalize_optional(input.notes),
        };
        SaleRepository::insert_in(&mut tx, &sale).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            product = %product.label(),
            quantity = sale.quantity,
            new_stock,
            "Sale recorded"
        );

        Ok(Posting {
            record: sale,
            new_stock,
        })
    }

    /// Changes the low-stock threshold of a product. Stock is untouched.
    pub async fn set_reorder_level(&self, product_id: &str, level: i64) -> ServiceResult<Product> {
        validate_reorder_level(level)?;

        let products = self.db.products();
        products.set_reorder_level(product_id, level).await?;

        info!(product_id = %product_id, level, "Reorder level set");

        products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use stockroom_core::{Money, NewSupplier};

    use super::*;
    use crate::service::test_support::{add_widget, service};
    use crate::service::ErrorKind;

    fn sale(product: &Product, quantity: i64) -> NewSale {
        NewSale {
            product_id: product.id.clone(),
            quantity,
            ..Default::default()
        }
    }

    fn purchase(product: &Product, quantity: i64, unit_cost: i64) -> NewPurchase {
        NewPurchase {
            product_id: product.id.clone(),
            quantity,
            unit_cost: Money::from_cents(unit_cost),
            ..Default::default()
        }
    }

    async fn stock_of(service: &InventoryService, product: &Product) -> i64 {
        service.get_product(&product.id).await.unwrap().current_stock
    }

    async fn ledger_len(service: &InventoryService, product: &Product) -> usize {
        let db = service.database();
        db.purchases().list_for_product(&product.id).await.unwrap().len()
            + db.sales().list_for_product(&product.id).await.unwrap().len()
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    #[tokio::test]
    async fn test_purchase_adds_stock_and_totals() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 3, 0).await;

        let posting = service.record_purchase(purchase(&widget, 20, 199)).await.unwrap();

        assert_eq!(posting.new_stock, 23);
        assert_eq!(posting.record.total_cents, 20 * 199);
        assert_eq!(posting.record.unit_cost_cents, 199);
        assert_eq!(stock_of(&service, &widget).await, 23);

        let stored = service
            .database()
            .purchases()
            .get_by_id(&posting.record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, posting.record);
    }

    #[tokio::test]
    async fn test_purchase_with_supplier() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 0, 0).await;
        let acme = service
            .add_supplier(NewSupplier {
                name: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut input = purchase(&widget, 5, 100);
        input.supplier_id = Some(acme.id.clone());
        let posting = service.record_purchase(input).await.unwrap();
        assert_eq!(posting.record.supplier_id.as_deref(), Some(acme.id.as_str()));

        let mut input = purchase(&widget, 5, 100);
        input.supplier_id = Some("no-such-supplier".to_string());
        let err = service.record_purchase(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(stock_of(&service, &widget).await, 5);
    }

    #[tokio::test]
    async fn test_purchase_keeps_explicit_timestamp() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 0, 0).await;
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap();

        let mut input = purchase(&widget, 1, 100);
        input.purchased_at = Some(at);
        let posting = service.record_purchase(input).await.unwrap();
        assert_eq!(posting.record.purchased_at, at);
    }

    #[tokio::test]
    async fn test_purchase_rejects_bad_input_without_writing() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 0).await;

        for qty in [0, -1, -50] {
            let err = service.record_purchase(purchase(&widget, qty, 100)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "qty {qty}");
        }

        let err = service.record_purchase(purchase(&widget, 1, -1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert_eq!(stock_of(&service, &widget).await, 10);
        assert_eq!(ledger_len(&service, &widget).await, 0);
    }

    #[tokio::test]
    async fn test_purchase_unknown_product() {
        let service = service().await;
        let err = service
            .record_purchase(NewPurchase {
                product_id: "missing".to_string(),
                quantity: 1,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "Product"));
    }

    // =========================================================================
    // Sales
    // =========================================================================

    #[tokio::test]
    async fn test_sale_removes_stock_at_current_price() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 0).await;

        let posting = service.record_sale(sale(&widget, 4)).await.unwrap();

        assert_eq!(posting.new_stock, 6);
        assert_eq!(posting.record.unit_price_cents, 250);
        assert_eq!(posting.record.total_cents, 1000);
        assert_eq!(stock_of(&service, &widget).await, 6);
    }

    #[tokio::test]
    async fn test_sale_price_override_and_details() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 0).await;

        let posting = service
            .record_sale(NewSale {
                unit_price: Some(Money::from_cents(199)),
                customer_name: Some("  Asha ".to_string()),
                notes: Some("   ".to_string()),
                ..sale(&widget, 3)
            })
            .await
            .unwrap();

        assert_eq!(posting.record.total_cents, 597);
        assert_eq!(posting.record.customer_name.as_deref(), Some("Asha"));
        assert_eq!(posting.record.notes, None);

        let err = service
            .record_sale(NewSale {
                unit_price: Some(Money::from_cents(-5)),
                ..sale(&widget, 1)
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_sale_of_entire_stock_reaches_zero() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 5, 0).await;

        let posting = service.record_sale(sale(&widget, 5)).await.unwrap();
        assert_eq!(posting.new_stock, 0);

        let err = service.record_sale(sale(&widget, 1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
    }

    #[tokio::test]
    async fn test_oversell_fails_and_leaves_everything_untouched() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 4, 0).await;

        let err = service.record_sale(sale(&widget, 100)).await.unwrap_err();
        match err {
            ServiceError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 4);
                assert_eq!(requested, 100);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&service, &widget).await, 4);
        assert!(service
            .database()
            .sales()
            .list_for_product(&widget.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_sale_rejects_non_positive_quantity_without_writing() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 0).await;

        for qty in [0, -3] {
            let err = service.record_sale(sale(&widget, qty)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }

        assert_eq!(stock_of(&service, &widget).await, 10);
        assert_eq!(ledger_len(&service, &widget).await, 0);
    }

    #[tokio::test]
    async fn test_inactive_product_refuses_postings() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 0).await;
        service.deactivate_product(&widget.id).await.unwrap();

        let err = service.record_sale(sale(&widget, 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Inactive { .. })));

        let err = service.record_purchase(purchase(&widget, 1, 100)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Inactive { .. })));

        assert_eq!(stock_of(&service, &widget).await, 10);
    }

    #[tokio::test]
    async fn test_sale_keeps_price_snapshot() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 0).await;
        let posting = service.record_sale(sale(&widget, 1)).await.unwrap();

        service
            .update_product(
                &widget.id,
                stockroom_core::ProductUpdate {
                    price: Some(Money::from_cents(999)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = service
            .database()
            .sales()
            .get_by_id(&posting.record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.unit_price_cents, 250);
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    #[tokio::test]
    async fn test_stock_matches_ledger_and_never_goes_negative() {
        let service = service().await;
        let opening = 7;
        let widget = add_widget(&service, "Widget", opening, 0).await;

        // Deterministic mix of purchases, sales and oversells.
        let mut seed: u64 = 0x5eed;
        for _ in 0..60 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let qty = ((seed >> 33) % 12) as i64 + 1;
            let before = stock_of(&service, &widget).await;

            if (seed >> 17) % 3 == 0 {
                let posting = service.record_purchase(purchase(&widget, qty, 100)).await.unwrap();
                assert_eq!(posting.new_stock, before + qty);
            } else {
                match service.record_sale(sale(&widget, qty)).await {
                    Ok(posting) => assert_eq!(posting.new_stock, before - qty),
                    Err(ServiceError::InsufficientStock { .. }) => {
                        assert!(qty > before);
                        assert_eq!(stock_of(&service, &widget).await, before);
                    }
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }

            assert!(stock_of(&service, &widget).await >= 0);
        }

        let db = service.database();
        let bought = db.purchases().total_quantity_for_product(&widget.id).await.unwrap();
        let sold = db.sales().total_quantity_for_product(&widget.id).await.unwrap();
        assert_eq!(stock_of(&service, &widget).await, opening + bought - sold);
    }

    #[tokio::test]
    async fn test_widget_reorder_scenario() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 10, 5).await;

        let low_ids = |rows: Vec<stockroom_core::StockLevel>| {
            rows.into_iter().map(|r| r.product_id).collect::<Vec<_>>()
        };

        let posting = service.record_sale(sale(&widget, 4)).await.unwrap();
        assert_eq!(posting.new_stock, 6);
        assert!(!low_ids(service.low_stock().await.unwrap()).contains(&widget.id));

        let posting = service.record_sale(sale(&widget, 2)).await.unwrap();
        assert_eq!(posting.new_stock, 4);
        assert!(low_ids(service.low_stock().await.unwrap()).contains(&widget.id));

        let posting = service.record_purchase(purchase(&widget, 20, 150)).await.unwrap();
        assert_eq!(posting.new_stock, 24);
        assert!(!low_ids(service.low_stock().await.unwrap()).contains(&widget.id));
    }

    // =========================================================================
    // Reorder level
    // =========================================================================

    #[tokio::test]
    async fn test_set_reorder_level() {
        let service = service().await;
        let widget = add_widget(&service, "Widget", 3, 0).await;

        let updated = service.set_reorder_level(&widget.id, 5).await.unwrap();
        assert_eq!(updated.reorder_level, 5);
        assert_eq!(updated.current_stock, 3);
        assert!(updated.is_low_stock());

        let err = service.set_reorder_level(&widget.id, -1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service.set_reorder_level("missing", 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
