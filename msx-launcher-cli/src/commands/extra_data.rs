use std::fs::File;
use std::io::BufReader;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use msx_launcher_data::{extra_data_version, load_extra_data};
use msx_launcher_db::CatalogPersister;

use crate::cli_types::ExtraDataAction;
use crate::error::CliError;

/// `open` is only called for actions that touch the store.
pub(crate) fn run(
    action: ExtraDataAction,
    open: impl FnOnce() -> Result<CatalogPersister, CliError>,
) -> Result<(), CliError> {
    match action {
        ExtraDataAction::Reconcile { file } => {
            let extra_data = load_extra_data(&file)?;
            log::debug!("Loaded {} extra data entries", extra_data.len());

            let updated = open()?.update_game_extra_data_in_databases(&extra_data)?;
            log::info!(
                "Updated {} game(s) from {}",
                updated.if_supports_color(Stdout, |t| t.bold()),
                file.display(),
            );
        }
        ExtraDataAction::Version { file } => {
            let version = extra_data_version(BufReader::new(File::open(&file)?))?;
            log::info!("{version}");
        }
    }
    Ok(())
}
