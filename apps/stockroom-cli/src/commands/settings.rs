use std::path::Path;

use clap::{Args, Subcommand};

use crate::error::CliResult;
use crate::output::{render, OutputMode, SettingTable};
use crate::settings::{Settings, CURRENCY_ENV};

#[derive(Debug, Args)]
pub(crate) struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// Print the effective settings
    Show,
    /// Change one setting and save it (empty value resets it)
    Set(SetArgs),
}

#[derive(Debug, Args)]
struct SetArgs {
    /// currency_symbol, export_dir or backup_dir
    key: String,

    value: String,
}

/// `effective` is what `show` prints. `set` edits the file contents only,
/// then reapplies the environment for display.
pub(crate) fn run(
    command: SettingsCommand,
    effective: Settings,
    path: &Path,
    output: OutputMode,
) -> CliResult<()> {
    match command.command {
        SettingsSubcommand::Show => show(&effective, path, output),
        SettingsSubcommand::Set(args) => {
            let stored = set_and_save(path, &args.key, &args.value)?;
            let effective = stored.with_currency_override(std::env::var(CURRENCY_ENV).ok());
            show(&effective, path, output)
        }
    }
}

fn set_and_save(path: &Path, key: &str, value: &str) -> CliResult<Settings> {
    let mut stored = Settings::read(path)?;
    stored.set(key, value)?;
    stored.save(path)?;
    Ok(stored)
}

fn show(settings: &Settings, path: &Path, output: OutputMode) -> CliResult<()> {
    match output {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        OutputMode::Table => {
            println!("{}", render(settings.entries().into_iter().map(SettingTable::from)));
            println!("file: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(key: &str, value: &str) -> SettingsCommand {
        SettingsCommand {
            command: SettingsSubcommand::Set(SetArgs {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    #[test]
    fn test_set_keeps_saved_currency_under_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "currency_symbol = \"$\"\n").unwrap();

        let effective = Settings::read(&path)
            .unwrap()
            .with_currency_override(Some("EUR".to_string()));
        run(set("export_dir", "/tmp/x"), effective, &path, OutputMode::Json).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("currency_symbol = \"$\""), "{saved}");
        assert!(!saved.contains("EUR"));
        assert!(saved.contains("/tmp/x"));
    }

    #[test]
    fn test_set_unknown_key_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let result = run(set("colour", "blue"), Settings::default(), &path, OutputMode::Table);
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
