//! Read-only listings and reports, plus backup.
//!
//! These go straight to the repositories; nothing here needs the posting
//! transaction.

use std::path::Path;

use tracing::info;

use stockroom_core::{DateRange, PurchaseLine, SaleLine, SalesSummary, StockLevel};

use super::{InventoryService, ServiceResult};

impl InventoryService {
    /// Stock snapshot of every active product.
    pub async fn stock_levels(&self) -> ServiceResult<Vec<StockLevel>> {
        Ok(self.db.reports().stock_levels().await?)
    }

    /// Exactly the active products with stock below their reorder level.
    pub async fn low_stock(&self) -> ServiceResult<Vec<StockLevel>> {
        Ok(self.db.reports().low_stock().await?)
    }

    /// Per-product sales totals, highest revenue first.
    pub async fn sales_summary(&self, range: Option<DateRange>) -> ServiceResult<Vec<SalesSummary>> {
        Ok(self.db.reports().sales_summary(range.as_ref()).await?)
    }

    /// Sales inside the range, oldest first.
    pub async fn sales_between(&self, range: DateRange) -> ServiceResult<Vec<SaleLine>> {
        Ok(self.db.sales().list_between(&range).await?)
    }

    /// Purchases inside the range, oldest first.
    pub async fn purchases_between(&self, range: DateRange) -> ServiceResult<Vec<PurchaseLine>> {
        Ok(self.db.purchases().list_between(&range).await?)
    }

    /// Latest sales, newest first.
    pub async fn recent_sales(&self, limit: u32) -> ServiceResult<Vec<SaleLine>> {
        Ok(self.db.sales().list_recent(limit).await?)
    }

    /// Latest purchases, newest first.
    pub async fn recent_purchases(&self, limit: u32) -> ServiceResult<Vec<PurchaseLine>> {
        Ok(self.db.purchases().list_recent(limit).await?)
    }

    /// Writes a consistent copy of the database to `target`.
    pub async fn backup_to(&self, target: &Path) -> ServiceResult<()> {
        self.db.backup_to(target).await?;
        info!(target = %target.display(), "Backup written");
        Ok(())
    }
}
