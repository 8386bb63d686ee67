use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, ValueEnum};
use stockroom_core::DateRange;
use stockroom_db::InventoryService;

use super::{Context, RangeArgs};
use crate::error::{CliError, CliResult};
use crate::export::{
    default_export_path, write_csv_file, ExportRow, ProductRow, PurchaseRow, SaleRow,
    SalesSummaryRow, StockRow,
};
use crate::output::OutputMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportKind {
    /// Whole catalog, deactivated products included
    Products,
    /// Stock on hand for active products
    Stock,
    /// Active products below their reorder level
    LowStock,
    /// Quantity and revenue per product
    SalesSummary,
    /// Sale ledger
    Sales,
    /// Purchase ledger
    Purchases,
}

impl ExportKind {
    /// File name stem, also used in the default path.
    fn stem(self) -> &'static str {
        match self {
            ExportKind::Products => "products",
            ExportKind::Stock => "stock",
            ExportKind::LowStock => "low_stock",
            ExportKind::SalesSummary => "sales_summary",
            ExportKind::Sales => "sales",
            ExportKind::Purchases => "purchases",
        }
    }

    fn takes_range(self) -> bool {
        matches!(
            self,
            ExportKind::SalesSummary | ExportKind::Sales | ExportKind::Purchases
        )
    }
}

#[derive(Debug, Args)]
pub(crate) struct ExportArgs {
    kind: ExportKind,

    /// Target file. Defaults to <export_dir>/<kind>_<YYYYMMDD>.csv
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(flatten)]
    range: RangeArgs,
}

pub(crate) async fn run(args: ExportArgs, ctx: &Context) -> CliResult<()> {
    let range = args.range.range()?;
    if range.is_some() && !args.kind.takes_range() {
        return Err(CliError::Usage(format!(
            "--from/--to do not apply to the {} export",
            args.kind.stem()
        )));
    }

    let path = args.output.unwrap_or_else(|| {
        default_export_path(
            &ctx.settings.export_dir(),
            args.kind.stem(),
            Utc::now().date_naive(),
        )
    });

    let rows = write_kind(&ctx.service, args.kind, range, &path).await?;

    match ctx.output {
        OutputMode::Json => println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "rows": rows })
        ),
        OutputMode::Table => println!("wrote {} rows to {}", rows, path.display()),
    }
    Ok(())
}

async fn write_kind(
    service: &InventoryService,
    kind: ExportKind,
    range: Option<DateRange>,
    path: &Path,
) -> CliResult<usize> {
    match kind {
        ExportKind::Products => {
            let products = service.list_products(true).await?;
            write_rows::<ProductRow, _>(path, &products)
        }
        ExportKind::Stock => {
            let levels = service.stock_levels().await?;
            write_rows::<StockRow, _>(path, &levels)
        }
        ExportKind::LowStock => {
            let levels = service.low_stock().await?;
            write_rows::<StockRow, _>(path, &levels)
        }
        ExportKind::SalesSummary => {
            let summary = service.sales_summary(range).await?;
            write_rows::<SalesSummaryRow, _>(path, &summary)
        }
        ExportKind::Sales => {
            let sales = match range {
                Some(range) => service.sales_between(range).await?,
                None => oldest_first(service.recent_sales(u32::MAX).await?),
            };
            write_rows::<SaleRow, _>(path, &sales)
        }
        ExportKind::Purchases => {
            let purchases = match range {
                Some(range) => service.purchases_between(range).await?,
                None => oldest_first(service.recent_purchases(u32::MAX).await?),
            };
            write_rows::<PurchaseRow, _>(path, &purchases)
        }
    }
}

fn write_rows<'a, R, T>(path: &Path, items: &'a [T]) -> CliResult<usize>
where
    R: ExportRow + From<&'a T>,
{
    let rows: Vec<R> = items.iter().map(R::from).collect();
    write_csv_file(path, &rows)
}

/// Ledger files read top to bottom in time order.
fn oldest_first<T>(mut newest_first: Vec<T>) -> Vec<T> {
    newest_first.reverse();
    newest_first
}
