//! Stockroom - command-line entry point.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    stockroom_cli::run().await
}
