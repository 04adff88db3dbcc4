use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use msx_launcher_db::CatalogPersister;

use crate::cli_types::DbAction;
use crate::error::CliError;

pub(crate) fn run(persister: &CatalogPersister, action: DbAction) -> Result<(), CliError> {
    match action {
        DbAction::List => {
            run_list(persister);
            Ok(())
        }
        DbAction::Create { name } => {
            persister.create_database(&name)?;
            log::info!("Created database {}", name.if_supports_color(Stdout, |t| t.bold()));
            Ok(())
        }
        DbAction::Delete { name } => {
            persister.delete_database(&name)?;
            log::info!("Deleted database {}", name.if_supports_color(Stdout, |t| t.bold()));
            Ok(())
        }
        DbAction::Rename { old, new } => {
            persister.rename_database(&old, &new)?;
            log::info!(
                "Renamed {} to {}",
                old.if_supports_color(Stdout, |t| t.bold()),
                new.if_supports_color(Stdout, |t| t.bold()),
            );
            Ok(())
        }
        DbAction::Recreate { name } => {
            persister.recreate_database(&name)?;
            log::info!("Emptied database {}", name.if_supports_color(Stdout, |t| t.bold()));
            Ok(())
        }
    }
}

fn run_list(persister: &CatalogPersister) {
    let databases = persister.get_databases();
    if databases.is_empty() {
        log::info!("{}", "No databases".if_supports_color(Stdout, |t| t.dimmed()));
        return;
    }

    for name in &databases {
        let games = persister.get_games(name).map(|g| g.len()).unwrap_or(0);
        let backups = persister.get_backups(name).len();
        log::info!(
            "  {} {}",
            name.if_supports_color(Stdout, |t| t.bold()),
            format!("({games} games, {backups} backups)").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
