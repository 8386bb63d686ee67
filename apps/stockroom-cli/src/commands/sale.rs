use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use stockroom_core::{Money, NewSale, SaleLine, DEFAULT_RECENT_LIMIT};

use super::{Context, RangeArgs};
use crate::error::CliResult;
use crate::output::{print_rows, OutputMode, SaleTable};

#[derive(Debug, Args)]
pub(crate) struct SaleCommand {
    #[command(subcommand)]
    command: SaleSubcommand,
}

#[derive(Debug, Subcommand)]
enum SaleSubcommand {
    /// Sell stock: fails when the shelf holds less than the quantity
    Record(RecordSaleArgs),
    /// List sales, newest first (or a date range, oldest first)
    List(ListSalesArgs),
}

#[derive(Debug, Args)]
struct RecordSaleArgs {
    /// Product id, SKU or name
    product: String,

    #[arg(long, short)]
    quantity: i64,

    /// Price per unit. Defaults to the product's current price
    #[arg(long)]
    price: Option<Money>,

    #[arg(long)]
    customer: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    /// When the sale happened (RFC 3339). Defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
struct ListSalesArgs {
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    limit: u32,

    #[command(flatten)]
    range: RangeArgs,
}

pub(crate) async fn run(command: SaleCommand, ctx: &Context) -> CliResult<()> {
    let service = &ctx.service;

    match command.command {
        SaleSubcommand::Record(args) => {
            let product = service.find_product(&args.product).await?;

            let posting = service
                .record_sale(NewSale {
                    product_id: product.id.clone(),
                    quantity: args.quantity,
                    unit_price: args.price,
                    sold_at: args.at,
                    customer_name: args.customer,
                    notes: args.notes,
                })
                .await?;

            match ctx.output {
                OutputMode::Json => println!("{}", serde_json::to_string_pretty(&posting)?),
                OutputMode::Table => {
                    println!(
                        "sold {} x {} at {} = {}; stock now {}",
                        posting.record.quantity,
                        product.label(),
                        ctx.settings.format_cents(posting.record.unit_price_cents),
                        ctx.settings.format_money(posting.record.total()),
                        posting.new_stock
                    );
                    if posting.new_stock < product.reorder_level {
                        println!(
                            "warning: {} is below its reorder level of {}",
                            product.label(),
                            product.reorder_level
                        );
                    }
                }
            }
            Ok(())
        }
        SaleSubcommand::List(args) => {
            let sales = match args.range.range()? {
                Some(range) => service.sales_between(range).await?,
                None => service.recent_sales(args.limit).await?,
            };
            print_rows(ctx.output, &sales, |s: &SaleLine| {
                SaleTable::new(s, &ctx.settings)
            })
        }
    }
}
