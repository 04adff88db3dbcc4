use chrono::{DateTime, SecondsFormat, Utc};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use msx_launcher_data::DatabaseBackup;
use msx_launcher_db::{CatalogPersister, MAX_BACKUPS};

use crate::cli_types::BackupAction;
use crate::error::CliError;

pub(crate) fn run(persister: &CatalogPersister, action: BackupAction) -> Result<(), CliError> {
    match action {
        BackupAction::Create { database } => {
            let backup = persister.backup_database(&database)?;
            log::info!(
                "Backed up {} at {}",
                database.if_supports_color(Stdout, |t| t.bold()),
                format_timestamp(&backup.timestamp).if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        BackupAction::List { database } => {
            let backups = persister.get_backups(&database);
            log::info!(
                "{} ({}/{MAX_BACKUPS} backups)",
                database.if_supports_color(Stdout, |t| t.bold()),
                backups.len(),
            );
            for backup in &backups {
                log::info!("  {}", format_timestamp(&backup.timestamp));
            }
        }
        BackupAction::Restore {
            database,
            timestamp,
        } => {
            let backup = DatabaseBackup::new(&database, parse_timestamp(&timestamp)?);
            persister.restore_backup(&backup)?;
            log::info!(
                "Restored {} from {}",
                database.if_supports_color(Stdout, |t| t.bold()),
                timestamp.if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        BackupAction::Delete {
            database,
            timestamp,
        } => {
            let backup = DatabaseBackup::new(&database, parse_timestamp(&timestamp)?);
            persister.delete_backup(&backup)?;
            log::info!("Deleted backup {timestamp} of {database}");
        }
    }
    Ok(())
}

/// RFC 3339 with millisecond precision, the resolution backups are stored at.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::invalid_argument(format!("timestamp '{value}': {e}")))
}
