use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::cli_types::ConfigAction;
use crate::error::CliError;
use crate::settings;

pub(crate) fn run(action: ConfigAction, database_file: &Path) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => run_show(database_file),
        ConfigAction::Path => log::info!("{}", settings::settings_path().display()),
        ConfigAction::SetDatabaseFile { path } => {
            settings::save_database_file(&path)
                .map_err(|e| CliError::config(format!("failed to save settings: {e}")))?;
            log::info!(
                "Saved database file {}",
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
    }
    Ok(())
}

fn run_show(database_file: &Path) {
    let path = settings::settings_path();
    log::info!(
        "{}",
        "msx-launcher Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Database file: {}",
        database_file.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    if let Some(contents) = settings::load_settings_string() {
        log::info!("");
        for line in contents.lines() {
            log::info!("  {line}");
        }
    }
}
