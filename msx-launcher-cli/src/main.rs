//! msx-launcher CLI
//!
//! Command-line interface over the launcher's game databases.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use msx_launcher_db::CatalogPersister;

use crate::cli_types::{Cli, Commands};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e.if_supports_color(Stderr, |t| t.red()));
        std::process::exit(1);
    }
}

/// Normal output goes through `log::info!`, so `--quiet` hides it and
/// `--verbose` adds debug messages with timestamps. `RUST_LOG` still applies.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    if !verbose {
        builder.format(|buf, record| match record.level() {
            log::Level::Info | log::Level::Debug | log::Level::Trace => {
                writeln!(buf, "{}", record.args())
            }
            level => writeln!(buf, "{level}: {}", record.args()),
        });
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let database_file = settings::resolve_database_file(cli.database_file);

    match cli.command {
        Commands::Db { action } => commands::database::run(&open(&database_file)?, action),
        Commands::Backup { action } => commands::backup::run(&open(&database_file)?, action),
        Commands::Games { action } => commands::games::run(&open(&database_file)?, action),
        Commands::Favorite { action } => commands::favorite::run(&open(&database_file)?, action),
        Commands::ExtraData { action } => commands::extra_data::run(action, || open(&database_file)),
        Commands::Machine { action } => commands::machine::run(&open(&database_file)?, action),
        Commands::Config { action } => commands::config::run(action, &database_file),
    }
}

fn open(database_file: &Path) -> Result<CatalogPersister, CliError> {
    log::debug!("Opening launcher store {}", database_file.display());
    Ok(CatalogPersister::open(database_file)?)
}
