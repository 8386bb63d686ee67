use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;

use super::Context;
use crate::error::CliResult;
use crate::output::OutputMode;

#[derive(Debug, Args)]
pub(crate) struct BackupArgs {
    /// Target file (must not exist). Defaults to <backup_dir>/stockroom_<YYYYMMDD_HHMMSS>.db
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub(crate) async fn run(args: BackupArgs, ctx: &Context) -> CliResult<()> {
    let target = match args.output {
        Some(path) => path,
        None => {
            let dir = ctx.settings.backup_dir();
            std::fs::create_dir_all(&dir)?;
            dir.join(backup_file_name(Utc::now()))
        }
    };

    ctx.service.backup_to(&target).await?;

    match ctx.output {
        OutputMode::Json => println!(
            "{}",
            serde_json::json!({ "path": target.display().to_string() })
        ),
        OutputMode::Table => println!("backup written to {}", target.display()),
    }
    Ok(())
}

fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("stockroom_{}.db", at.format("%Y%m%d_%H%M%S"))
}
