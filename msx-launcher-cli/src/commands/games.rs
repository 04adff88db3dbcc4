use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use msx_launcher_data::Game;
use msx_launcher_db::{CatalogPersister, MoveDecider, MoveDecision};

use crate::cli_types::{GamesAction, OnConflict};
use crate::error::CliError;

pub(crate) fn run(persister: &CatalogPersister, action: GamesAction) -> Result<(), CliError> {
    match action {
        GamesAction::List { database, json } => run_list(persister, &database, json),
        GamesAction::Find { text, limit } => {
            let hits = persister.find_games(&text, limit);
            for hit in &hits {
                log::info!(
                    "  {} {}",
                    hit.game_name.if_supports_color(Stdout, |t| t.bold()),
                    format!("({})", hit.database_name).if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            log::info!("{} match(es) for '{text}'", hits.len());
            Ok(())
        }
        GamesAction::Import { database, file } => run_import(persister, &database, &file),
        GamesAction::Delete { database, names } => {
            let games = select(persister.get_games(&database)?, &names)?;
            persister.delete_games(&games, &database)?;
            log::info!("Deleted {} game(s) from {database}", games.len());
            Ok(())
        }
        GamesAction::Move {
            database,
            names,
            to,
            on_conflict,
        } => run_move(persister, &database, &names, &to, on_conflict),
    }
}

fn run_list(persister: &CatalogPersister, database: &str, json: bool) -> Result<(), CliError> {
    let games = persister.get_games(database)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }

    for game in &games {
        log::info!(
            "  {} {}",
            game.name.if_supports_color(Stdout, |t| t.bold()),
            format!("[{}]", game.machine).if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    log::info!("{} game(s) in {database}", games.len());
    Ok(())
}

fn run_import(persister: &CatalogPersister, database: &str, file: &Path) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(file)?;
    let games: Vec<Game> = serde_json::from_str(&contents)?;
    persister.save_games(&games, database)?;
    log::info!(
        "Imported {} game(s) into {}",
        games.len(),
        database.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

fn run_move(
    persister: &CatalogPersister,
    database: &str,
    names: &[String],
    to: &str,
    on_conflict: OnConflict,
) -> Result<(), CliError> {
    let games = select(persister.get_games(database)?, names)?;

    let moved = match on_conflict {
        OnConflict::Ask => {
            let mut decider = PromptDecider {
                destination: to,
                input: std::io::stdin().lock(),
            };
            persister.move_games(&games, database, to, &mut decider)?
        }
        policy => {
            let decision = fixed_decision(policy);
            let mut decider = |_: &str| decision;
            persister.move_games(&games, database, to, &mut decider)?
        }
    };

    for game in &moved {
        log::info!("  {}", game.name);
    }
    log::info!(
        "Moved {} of {} game(s) from {database} to {}",
        moved.len(),
        games.len(),
        to.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

/// The games of `available` named in `names`, or all of them when no names
/// are given. Unknown names are an error.
fn select(available: Vec<Game>, names: &[String]) -> Result<Vec<Game>, CliError> {
    if names.is_empty() {
        return Ok(available);
    }

    let known: HashSet<&str> = available.iter().map(|g| g.name.as_str()).collect();
    if let Some(missing) = names.iter().find(|n| !known.contains(n.as_str())) {
        return Err(CliError::invalid_argument(format!("no game named '{missing}'")));
    }

    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    Ok(available
        .into_iter()
        .filter(|g| wanted.contains(g.name.as_str()))
        .collect())
}

fn fixed_decision(policy: OnConflict) -> MoveDecision {
    match policy {
        OnConflict::YesAll => MoveDecision::YesToAll,
        OnConflict::NoAll => MoveDecision::NoToAll,
        OnConflict::Ask | OnConflict::Cancel => MoveDecision::Cancel,
    }
}

/// Asks on the terminal about each conflicting game.
struct PromptDecider<'a, R> {
    destination: &'a str,
    input: R,
}

impl<R: BufRead> MoveDecider for PromptDecider<'_, R> {
    fn decide(&mut self, game_name: &str) -> MoveDecision {
        loop {
            print!(
                "{} already exists in {}. Override? [y]es, [Y]es to all, [n]o, [N]o to all, [c]ancel: ",
                game_name.if_supports_color(Stdout, |t| t.bold()),
                self.destination,
            );
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                // End of input cancels rather than guessing.
                Ok(0) | Err(_) => return MoveDecision::Cancel,
                Ok(_) => {}
            }
            if let Some(decision) = parse_answer(&line) {
                return decision;
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<MoveDecision> {
    match line.trim() {
        "y" | "yes" => Some(MoveDecision::Yes),
        "Y" | "yes-all" => Some(MoveDecision::YesToAll),
        "n" | "no" => Some(MoveDecision::No),
        "N" | "no-all" => Some(MoveDecision::NoToAll),
        "c" | "C" | "cancel" => Some(MoveDecision::Cancel),
        _ => None,
    }
}
