//! # Command Tree
//!
//! ```text
//! stockroom [--db PATH] [--settings PATH] [--json] [-v]
//!   product   add | update | show | list | search | deactivate | reactivate | delete | reorder
//!   supplier  add | update | show | list | delete
//!   purchase  record | list
//!   sale      record | list
//!   report    stock | low-stock | sales-summary
//!   export    <products|stock|low-stock|sales-summary|sales|purchases>
//!   backup
//!   settings  show | set
//! ```
//!
//! Products and suppliers are addressed by id, SKU or exact name.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use stockroom_core::DateRange;
use stockroom_db::{DbConfig, InventoryService};
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::output::OutputMode;
use crate::settings::Settings;

mod backup;
mod export;
mod product;
mod purchase;
mod report;
mod sale;
mod settings;
mod supplier;

#[derive(Debug, Parser)]
#[command(
    name = "stockroom",
    version,
    about = "Small-shop inventory: products, suppliers, purchases, sales and reports",
    long_about = None
)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "STOCKROOM_DB_PATH")]
    db: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true, env = "STOCKROOM_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the product catalog
    Product(product::ProductCommand),
    /// Manage suppliers
    Supplier(supplier::SupplierCommand),
    /// Record and list stock receipts
    Purchase(purchase::PurchaseCommand),
    /// Record and list sales
    Sale(sale::SaleCommand),
    /// Stock and sales reports
    Report(report::ReportCommand),
    /// Write a listing or report to CSV
    Export(export::ExportArgs),
    /// Copy the database to a backup file
    Backup(backup::BackupArgs),
    /// Show or change settings
    Settings(settings::SettingsCommand),
}

/// What every data command gets to work with.
pub(crate) struct Context {
    pub service: InventoryService,
    pub settings: Settings,
    pub output: OutputMode,
}

impl Cli {
    pub async fn run(self) -> CliResult<()> {
        let output = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Table
        };

        let settings_path = match self.settings {
            Some(path) => path,
            None => Settings::default_path().ok_or(CliError::NoDataDir)?,
        };
        let settings = Settings::load(&settings_path)?;

        // Settings never touch the database.
        let command = match self.command {
            Commands::Settings(command) => {
                return settings::run(command, settings, &settings_path, output);
            }
            other => other,
        };

        let db_path = database_path(self.db)?;
        debug!(path = %db_path.display(), "Opening database");
        let service = InventoryService::open(DbConfig::new(db_path)).await?;

        let ctx = Context {
            service,
            settings,
            output,
        };
        let result = dispatch(command, &ctx).await;
        ctx.service.close().await;
        result
    }
}

async fn dispatch(command: Commands, ctx: &Context) -> CliResult<()> {
    match command {
        Commands::Product(command) => product::run(command, ctx).await,
        Commands::Supplier(command) => supplier::run(command, ctx).await,
        Commands::Purchase(command) => purchase::run(command, ctx).await,
        Commands::Sale(command) => sale::run(command, ctx).await,
        Commands::Report(command) => report::run(command, ctx).await,
        Commands::Export(args) => export::run(args, ctx).await,
        Commands::Backup(args) => backup::run(args, ctx).await,
        Commands::Settings(_) => Err(CliError::Usage(
            "settings commands do not use the database".to_string(),
        )),
    }
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.stockroom.stockroom/stockroom.db`
/// - **Windows**: `%APPDATA%\stockroom\stockroom\data\stockroom.db`
/// - **Linux**: `~/.local/share/stockroom/stockroom.db`
///
/// `--db` / `STOCKROOM_DB_PATH` wins when given.
fn database_path(explicit: Option<PathBuf>) -> CliResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let proj_dirs = ProjectDirs::from("com", "stockroom", "stockroom").ok_or(CliError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("stockroom.db"))
}

// =============================================================================
// Shared Arguments
// =============================================================================

/// `--from` / `--to` calendar-day filter.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RangeArgs {
    /// First day to include (YYYY-MM-DD, UTC)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD, UTC). Defaults to today when --from is given
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    /// `None` when neither bound was given.
    pub fn range(&self) -> CliResult<Option<DateRange>> {
        match (self.from, self.to) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(CliError::Usage("--to requires --from".to_string())),
            (Some(from), to) => {
                let to = to.unwrap_or_else(|| Utc::now().date_naive());
                Ok(Some(DateRange::days(from, to)?))
            }
        }
    }
}
