use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use stockroom_core::{Money, NewPurchase, PurchaseLine, DEFAULT_RECENT_LIMIT};

use super::{Context, RangeArgs};
use crate::error::CliResult;
use crate::output::{print_rows, OutputMode, PurchaseTable};

#[derive(Debug, Args)]
pub(crate) struct PurchaseCommand {
    #[command(subcommand)]
    command: PurchaseSubcommand,
}

#[derive(Debug, Subcommand)]
enum PurchaseSubcommand {
    /// Receive stock: adds the quantity to the product
    Record(RecordPurchaseArgs),
    /// List purchases, newest first (or a date range, oldest first)
    List(ListPurchasesArgs),
}

#[derive(Debug, Args)]
struct RecordPurchaseArgs {
    /// Product id, SKU or name
    product: String,

    #[arg(long, short)]
    quantity: i64,

    /// Cost per unit, e.g. 7.25
    #[arg(long)]
    unit_cost: Money,

    /// Supplier id or name
    #[arg(long)]
    supplier: Option<String>,

    /// When the goods arrived (RFC 3339). Defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
struct ListPurchasesArgs {
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    limit: u32,

    #[command(flatten)]
    range: RangeArgs,
}

pub(crate) async fn run(command: PurchaseCommand, ctx: &Context) -> CliResult<()> {
    let service = &ctx.service;

    match command.command {
        PurchaseSubcommand::Record(args) => {
            let product = service.find_product(&args.product).await?;
            let supplier_id = match args.supplier {
                Some(token) => Some(service.find_supplier(&token).await?.id),
                None => None,
            };

            let posting = service
                .record_purchase(NewPurchase {
                    product_id: product.id.clone(),
                    supplier_id,
                    quantity: args.quantity,
                    unit_cost: args.unit_cost,
                    purchased_at: args.at,
                })
                .await?;

            match ctx.output {
                OutputMode::Json => println!("{}", serde_json::to_string_pretty(&posting)?),
                OutputMode::Table => println!(
                    "received {} x {} at {} = {}; stock now {}",
                    posting.record.quantity,
                    product.label(),
                    ctx.settings.format_cents(posting.record.unit_cost_cents),
                    ctx.settings.format_money(posting.record.total()),
                    posting.new_stock
                ),
            }
            Ok(())
        }
        PurchaseSubcommand::List(args) => {
            let purchases = match args.range.range()? {
                Some(range) => service.purchases_between(range).await?,
                None => service.recent_purchases(args.limit).await?,
            };
            print_rows(ctx.output, &purchases, |p: &PurchaseLine| {
                PurchaseTable::new(p, &ctx.settings)
            })
        }
    }
}
