use clap::{Args, Subcommand};
use stockroom_core::{NewSupplier, SupplierUpdate};

use super::Context;
use crate::error::{CliError, CliResult};
use crate::output::{print_one, print_rows, SupplierTable};

#[derive(Debug, Args)]
pub(crate) struct SupplierCommand {
    #[command(subcommand)]
    command: SupplierSubcommand,
}

#[derive(Debug, Subcommand)]
enum SupplierSubcommand {
    /// Add a supplier
    Add(AddSupplierArgs),
    /// Change a supplier's details (pass an empty string to clear a field)
    Update(UpdateSupplierArgs),
    /// Show one supplier
    Show(SupplierRef),
    /// List suppliers by name
    List,
    /// Remove a supplier; products and purchases keep their history
    Delete(SupplierRef),
}

#[derive(Debug, Args)]
struct AddSupplierArgs {
    /// Supplier name (unique)
    name: String,

    #[arg(long)]
    contact: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateSupplierArgs {
    /// Supplier id or name
    supplier: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    contact: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

#[derive(Debug, Args)]
struct SupplierRef {
    /// Supplier id or name
    supplier: String,
}

pub(crate) async fn run(command: SupplierCommand, ctx: &Context) -> CliResult<()> {
    let service = &ctx.service;

    match command.command {
        SupplierSubcommand::Add(args) => {
            let supplier = service
                .add_supplier(NewSupplier {
                    name: args.name,
                    contact_name: args.contact,
                    phone: args.phone,
                    email: args.email,
                    address: args.address,
                })
                .await?;
            print_one(ctx.output, &supplier, SupplierTable::from(&supplier))
        }
        SupplierSubcommand::Update(args) => {
            let supplier = service.find_supplier(&args.supplier).await?;
            // Blank strings are normalized to NULL by the service.
            let update = SupplierUpdate {
                name: args.name,
                contact_name: args.contact.map(Some),
                phone: args.phone.map(Some),
                email: args.email.map(Some),
                address: args.address.map(Some),
            };
            if update.is_empty() {
                return Err(CliError::Usage("nothing to update".to_string()));
            }

            let updated = service.update_supplier(&supplier.id, update).await?;
            print_one(ctx.output, &updated, SupplierTable::from(&updated))
        }
        SupplierSubcommand::Show(args) => {
            let supplier = service.find_supplier(&args.supplier).await?;
            print_one(ctx.output, &supplier, SupplierTable::from(&supplier))
        }
        SupplierSubcommand::List => {
            let suppliers = service.list_suppliers().await?;
            print_rows(ctx.output, &suppliers, SupplierTable::from)
        }
        SupplierSubcommand::Delete(args) => {
            let supplier = service.find_supplier(&args.supplier).await?;
            service.delete_supplier(&supplier.id).await?;
            println!("deleted supplier {}", supplier.name);
            Ok(())
        }
    }
}
