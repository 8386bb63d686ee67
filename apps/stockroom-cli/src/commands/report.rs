use clap::{Args, Subcommand};
use stockroom_core::{Money, SalesSummary, StockLevel};

use super::{Context, RangeArgs};
use crate::error::CliResult;
use crate::output::{print_rows, OutputMode, StockTable, SummaryTable};

#[derive(Debug, Args)]
pub(crate) struct ReportCommand {
    #[command(subcommand)]
    command: ReportSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReportSubcommand {
    /// Stock on hand for every active product
    Stock,
    /// Active products below their reorder level, largest shortfall first
    LowStock,
    /// Quantity and revenue per product, best sellers first
    SalesSummary(SalesSummaryArgs),
}

#[derive(Debug, Args)]
struct SalesSummaryArgs {
    #[command(flatten)]
    range: RangeArgs,
}

pub(crate) async fn run(command: ReportCommand, ctx: &Context) -> CliResult<()> {
    let service = &ctx.service;
    let stock_table = |s: &StockLevel| StockTable::new(s, &ctx.settings);

    match command.command {
        ReportSubcommand::Stock => {
            let levels = service.stock_levels().await?;
            print_rows(ctx.output, &levels, stock_table)
        }
        ReportSubcommand::LowStock => {
            let levels = service.low_stock().await?;
            if levels.is_empty() && ctx.output == OutputMode::Table {
                println!("all products are at or above their reorder level");
                return Ok(());
            }
            print_rows(ctx.output, &levels, stock_table)
        }
        ReportSubcommand::SalesSummary(args) => {
            let summary = service.sales_summary(args.range.range()?).await?;
            print_rows(ctx.output, &summary, |s: &SalesSummary| {
                SummaryTable::new(s, &ctx.settings)
            })?;

            if ctx.output == OutputMode::Table && !summary.is_empty() {
                let revenue: Money = summary.iter().map(SalesSummary::total_revenue).sum();
                let units: i64 = summary.iter().map(|s| s.total_quantity).sum();
                println!("total: {} units, {}", units, ctx.settings.format_money(revenue));
            }
            Ok(())
        }
    }
}
