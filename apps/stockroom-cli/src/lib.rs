//! # stockroom-cli: Command-Line Front End for Stockroom
//!
//! Parses arguments, opens the database and prints results. All business
//! rules live in `stockroom-db`'s `InventoryService`.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom CLI Startup                            │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                             │
//! │  2. Initialize tracing (logging, stderr)                               │
//! │  3. Load settings.toml (defaults when missing)                         │
//! │  4. Resolve the database path (--db / STOCKROOM_DB_PATH / data dir)    │
//! │  5. Open the pool and run migrations                                   │
//! │  6. Run the command, close the pool                                    │
//! │  7. Map the outcome to an exit code                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//! ```text
//! stockroom-cli/src/
//! ├── main.rs          # Binary entry point
//! ├── lib.rs           # run(), tracing setup (this file)
//! ├── commands/        # clap command tree, one file per noun
//! ├── output.rs        # Console tables and --json
//! ├── export.rs        # CSV writers
//! ├── settings.rs      # settings.toml
//! └── error.rs         # CliError and exit codes
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod export;
pub mod output;
pub mod settings;

pub use commands::Cli;
pub use error::{CliError, CliResult};

/// Runs the `stockroom` binary: parse, execute, report.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `-v` raises the level. Logs go to stderr so
/// `--json` output stays machine readable.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,stockroom=info,sqlx=warn",
        1 => "info,stockroom=debug,sqlx=warn",
        _ => "debug,stockroom=trace,sqlx=info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
