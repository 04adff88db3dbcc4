use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use msx_launcher_db::CatalogPersister;

use crate::cli_types::MachineAction;
use crate::error::CliError;

pub(crate) fn run(persister: &CatalogPersister, action: MachineAction) -> Result<(), CliError> {
    match action {
        MachineAction::Update {
            to,
            from,
            database,
            backup,
        } => {
            let updated =
                persister.update_machine(&to, from.as_deref(), database.as_deref(), backup)?;
            log::info!(
                "Set machine {} on {updated} game(s)",
                to.if_supports_color(Stdout, |t| t.cyan()),
            );
            if backup {
                log::info!("Affected databases were backed up first");
            }
        }
    }
    Ok(())
}
