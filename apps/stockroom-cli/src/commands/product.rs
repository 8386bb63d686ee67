use clap::{Args, Subcommand};
use stockroom_core::{Money, NewProduct, Product, ProductUpdate};

use super::Context;
use crate::error::{CliError, CliResult};
use crate::output::{print_one, print_rows, ProductTable};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Add a product to the catalog
    Add(AddProductArgs),
    /// Change a product's details
    Update(UpdateProductArgs),
    /// Show one product
    Show(ProductRef),
    /// List products by name
    List(ListProductsArgs),
    /// Find products whose name or SKU contains the text
    Search(SearchArgs),
    /// Hide a product from listings and refuse postings against it
    Deactivate(ProductRef),
    /// Undo a deactivation
    Reactivate(ProductRef),
    /// Remove a product that has never been bought or sold
    Delete(ProductRef),
    /// Set the stock level below which a product counts as low
    Reorder(ReorderArgs),
}

#[derive(Debug, Args)]
struct AddProductArgs {
    /// Product name (unique)
    name: String,

    /// Stock keeping unit, e.g. WID-001 (unique)
    #[arg(long)]
    sku: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Selling price, e.g. 12.50
    #[arg(long)]
    price: Money,

    /// Low-stock threshold
    #[arg(long, default_value_t = 0)]
    reorder_level: i64,

    /// Stock on hand today
    #[arg(long = "stock", default_value_t = 0)]
    opening_stock: i64,

    /// Supplier id or name
    #[arg(long)]
    supplier: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    /// Product id, SKU or name
    product: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long, conflicts_with = "clear_sku")]
    sku: Option<String>,

    #[arg(long)]
    clear_sku: bool,

    #[arg(long, conflicts_with = "clear_description")]
    description: Option<String>,

    #[arg(long)]
    clear_description: bool,

    #[arg(long)]
    price: Option<Money>,

    #[arg(long)]
    reorder_level: Option<i64>,

    /// Supplier id or name
    #[arg(long, conflicts_with = "clear_supplier")]
    supplier: Option<String>,

    #[arg(long)]
    clear_supplier: bool,
}

#[derive(Debug, Args)]
struct ProductRef {
    /// Product id, SKU or name
    product: String,
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Include deactivated products
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Args)]
struct ReorderArgs {
    /// Product id, SKU or name
    product: String,

    level: i64,
}

/// `--x` / `--clear-x` pair to the `Option<Option<_>>` update convention.
fn nullable(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

pub(crate) async fn run(command: ProductCommand, ctx: &Context) -> CliResult<()> {
    let service = &ctx.service;
    let table = |p: &Product| ProductTable::new(p, &ctx.settings);

    match command.command {
        ProductSubcommand::Add(args) => {
            let supplier_id = match args.supplier {
                Some(token) => Some(service.find_supplier(&token).await?.id),
                None => None,
            };
            let product = service
                .add_product(NewProduct {
                    name: args.name,
                    sku: args.sku,
                    description: args.description,
                    price: args.price,
                    reorder_level: args.reorder_level,
                    opening_stock: args.opening_stock,
                    supplier_id,
                })
                .await?;
            print_one(ctx.output, &product, table(&product))
        }
        ProductSubcommand::Update(args) => {
            let product = service.find_product(&args.product).await?;
            let supplier_id = match args.supplier {
                Some(token) => Some(Some(service.find_supplier(&token).await?.id)),
                None if args.clear_supplier => Some(None),
                None => None,
            };
            let update = ProductUpdate {
                name: args.name,
                sku: nullable(args.sku, args.clear_sku),
                description: nullable(args.description, args.clear_description),
                price: args.price,
                reorder_level: args.reorder_level,
                supplier_id,
            };
            if update.is_empty() {
                return Err(CliError::Usage("nothing to update".to_string()));
            }

            let updated = service.update_product(&product.id, update).await?;
            print_one(ctx.output, &updated, table(&updated))
        }
        ProductSubcommand::Show(args) => {
            let product = service.find_product(&args.product).await?;
            print_one(ctx.output, &product, table(&product))
        }
        ProductSubcommand::List(args) => {
            let products = service.list_products(args.all).await?;
            print_rows(ctx.output, &products, table)
        }
        ProductSubcommand::Search(args) => {
            let products = service.search_products(&args.query).await?;
            print_rows(ctx.output, &products, table)
        }
        ProductSubcommand::Deactivate(args) => {
            let product = service.find_product(&args.product).await?;
            service.deactivate_product(&product.id).await?;
            println!("deactivated {}", product.label());
            Ok(())
        }
        ProductSubcommand::Reactivate(args) => {
            let product = service.find_product(&args.product).await?;
            service.reactivate_product(&product.id).await?;
            println!("reactivated {}", product.label());
            Ok(())
        }
        ProductSubcommand::Delete(args) => {
            let product = service.find_product(&args.product).await?;
            service.delete_product(&product.id).await?;
            println!("deleted {}", product.label());
            Ok(())
        }
        ProductSubcommand::Reorder(args) => {
            let product = service.find_product(&args.product).await?;
            let updated = service.set_reorder_level(&product.id, args.level).await?;
            print_one(ctx.output, &updated, table(&updated))
        }
    }
}
