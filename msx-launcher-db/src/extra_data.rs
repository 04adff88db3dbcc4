//! Refreshing derived game fields from extra data across every database.

use std::collections::HashMap;

use msx_launcher_data::types::{ExtraData, Game};
use rusqlite::{params, Connection};

use crate::action::{resolve_database_id, with_transaction};
use crate::databases::database_names;
use crate::error::{storage_failure, PersistenceError};
use crate::games::load_games;
use crate::store::CatalogStore;

/// Recomputes the extra-data derived fields of a game.
pub trait ExtraDataBuilder {
    /// Return `game` with its derived fields recomputed from `extra_data`,
    /// which is keyed by sha1.
    fn refresh(&self, game: &Game, extra_data: &HashMap<String, ExtraData>) -> Game;
}

/// Applies the entry matching the game's sha1; games without one are returned
/// unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtraDataRefresher;

impl ExtraDataBuilder for ExtraDataRefresher {
    fn refresh(&self, game: &Game, extra_data: &HashMap<String, ExtraData>) -> Game {
        let mut refreshed = game.clone();
        let Some(data) = game.sha1.as_ref().and_then(|sha1| extra_data.get(sha1)) else {
            return refreshed;
        };

        refreshed.msx_gen_id = data.msx_gen_id;
        refreshed.generations = data.decoded_generations();
        refreshed.sound_chips = data.decoded_sound_chips();
        refreshed.genre1 = data.genre1;
        refreshed.genre2 = data.genre2;
        refreshed.screenshot_suffix = data.suffix.clone();
        refreshed
    }
}

/// Refresh every game of every database and store the ones that changed.
///
/// A database whose games cannot be loaded is skipped. Returns the number of
/// games updated.
pub fn update_game_extra_data_in_databases(
    store: &CatalogStore,
    extra_data: &HashMap<String, ExtraData>,
    builder: &dyn ExtraDataBuilder,
) -> Result<usize, PersistenceError> {
    with_transaction(store, |conn| {
        let databases = database_names(conn).map_err(storage_failure)?;

        let mut batches: Vec<(i64, Vec<Game>)> = Vec::new();
        let mut updated = 0;
        for database in &databases {
            let database_id = resolve_database_id(conn, database);
            let games = match load_games(conn, database_id) {
                Ok(games) => games,
                Err(e) => {
                    log::warn!("Skipping database '{database}' during extra data refresh: {e}");
                    continue;
                }
            };

            let changed: Vec<Game> = games
                .iter()
                .map(|game| builder.refresh(game, extra_data))
                .zip(&games)
                .filter(|(refreshed, original)| !refreshed.is_extra_data_equal(original))
                .map(|(refreshed, _)| refreshed)
                .collect();

            updated += changed.len();
            if !changed.is_empty() {
                batches.push((database_id, changed));
            }
        }

        for (database_id, games) in &batches {
            write_extra_data(conn, games, *database_id).map_err(storage_failure)?;
        }

        log::info!("Refreshed extra data of {updated} game(s)");
        Ok(updated)
    })
}

fn write_extra_data(conn: &Connection, games: &[Game], database_id: i64) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "UPDATE game SET
             msx = ?1, msx2 = ?2, msx2plus = ?3, turbo_r = ?4,
             psg = ?5, scc = ?6, scc_i = ?7, pcm = ?8,
             msx_music = ?9, msx_audio = ?10, moonsound = ?11, midi = ?12,
             genre1 = ?13, genre2 = ?14, msx_genid = ?15, screenshot_suffix = ?16
         WHERE name = ?17 AND database_id = ?18",
    )?;
    for game in games {
        let g = &game.generations;
        let s = &game.sound_chips;
        stmt.execute(params![
            g.msx,
            g.msx2,
            g.msx2plus,
            g.turbo_r,
            s.psg,
            s.scc,
            s.scc_i,
            s.pcm,
            s.msx_music,
            s.msx_audio,
            s.moonsound,
            s.midi,
            game.genre1,
            game.genre2,
            game.msx_gen_id,
            game.screenshot_suffix,
            game.name,
            database_id,
        ])?;
    }
    Ok(())
}
