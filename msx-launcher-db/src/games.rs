//! Game rows: column mapping plus the save, update, delete and load actions.

use std::collections::HashSet;

use msx_launcher_data::types::*;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::action::{resolve_database_id, with_connection, with_transaction};
use crate::error::{map_unique, storage_failure, PersistenceError};
use crate::store::CatalogStore;

/// Every persisted game column except the owning database, in binding order.
///
/// Shared by `game` and `game_backup` so snapshots copy with plain
/// `INSERT ... SELECT`.
pub(crate) const GAME_FIELDS: &str = "name, info, machine, rom_a, extension_rom, rom_b, \
     disk_a, disk_b, tape, harddisk, laserdisc, tcl_script, \
     msx, msx2, msx2plus, turbo_r, \
     psg, scc, scc_i, pcm, msx_music, msx_audio, moonsound, midi, \
     genre1, genre2, msx_genid, screenshot_suffix, sha1, size, \
     fdd_mode, tcl_script_override, input_device, connect_gfx9000";

const GAME_FIELD_COUNT: usize = 34;

// ── Binding ─────────────────────────────────────────────────────────────────

/// Values for [`GAME_FIELDS`], in the same order.
pub(crate) fn game_values(game: &Game) -> Vec<Value> {
    let g = &game.generations;
    let s = &game.sound_chips;
    vec![
        Value::Text(game.name.clone()),
        text(&game.info),
        Value::Text(game.machine.clone()),
        text(&game.rom_a),
        text(&game.extension_rom),
        text(&game.rom_b),
        text(&game.disk_a),
        text(&game.disk_b),
        text(&game.tape),
        text(&game.harddisk),
        text(&game.laserdisc),
        text(&game.tcl_script),
        flag(g.msx),
        flag(g.msx2),
        flag(g.msx2plus),
        flag(g.turbo_r),
        flag(s.psg),
        flag(s.scc),
        flag(s.scc_i),
        flag(s.pcm),
        flag(s.msx_music),
        flag(s.msx_audio),
        flag(s.moonsound),
        flag(s.midi),
        Value::Integer(game.genre1.into()),
        Value::Integer(game.genre2.into()),
        Value::Integer(game.msx_gen_id.into()),
        text(&game.screenshot_suffix),
        text(&game.sha1),
        Value::Integer(game.size),
        Value::Integer(game.fdd_mode.as_value().into()),
        flag(game.tcl_script_override),
        Value::Integer(game.input_device.as_value().into()),
        flag(game.connect_gfx9000),
    ]
}

fn text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::Text)
}

fn flag(value: bool) -> Value {
    Value::Integer(value.into())
}

/// `?1, ?2, ... ?n`
fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `name = ?1, info = ?2, ...` over [`GAME_FIELDS`].
fn assignments() -> String {
    GAME_FIELDS
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Row Mapping ─────────────────────────────────────────────────────────────

/// Map a row selected as [`GAME_FIELDS`].
pub(crate) fn row_to_game(row: &rusqlite::Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        name: row.get(0)?,
        info: row.get(1)?,
        machine: row.get(2)?,
        rom_a: row.get(3)?,
        extension_rom: row.get(4)?,
        rom_b: row.get(5)?,
        disk_a: row.get(6)?,
        disk_b: row.get(7)?,
        tape: row.get(8)?,
        harddisk: row.get(9)?,
        laserdisc: row.get(10)?,
        tcl_script: row.get(11)?,
        generations: Generations {
            msx: row.get(12)?,
            msx2: row.get(13)?,
            msx2plus: row.get(14)?,
            turbo_r: row.get(15)?,
        },
        sound_chips: SoundChips {
            psg: row.get(16)?,
            scc: row.get(17)?,
            scc_i: row.get(18)?,
            pcm: row.get(19)?,
            msx_music: row.get(20)?,
            msx_audio: row.get(21)?,
            moonsound: row.get(22)?,
            midi: row.get(23)?,
        },
        genre1: row.get(24)?,
        genre2: row.get(25)?,
        msx_gen_id: row.get(26)?,
        screenshot_suffix: row.get(27)?,
        sha1: row.get(28)?,
        size: row.get(29)?,
        fdd_mode: FddMode::from_value(row.get(30)?),
        tcl_script_override: row.get(31)?,
        input_device: InputDevice::from_value(row.get(32)?),
        connect_gfx9000: row.get(33)?,
    })
}

// ── Connection-level Statements ─────────────────────────────────────────────

/// Insert games into one database, reusing a single prepared statement.
pub(crate) fn insert_games(
    conn: &Connection,
    games: &[Game],
    database_id: i64,
) -> Result<(), PersistenceError> {
    let sql = format!(
        "INSERT INTO game ({GAME_FIELDS}, database_id) VALUES ({})",
        placeholders(GAME_FIELD_COUNT + 1)
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(storage_failure)?;
    for game in games {
        let mut values = game_values(game);
        values.push(Value::Integer(database_id));
        stmt.execute(params_from_iter(values))
            .map_err(|e| map_unique(e, || PersistenceError::GameAlreadyExists(game.name.clone())))?;
    }
    Ok(())
}

/// Overwrite every column of the game currently named `old_name`.
///
/// Returns the number of rows changed (0 or 1).
pub(crate) fn update_game_row(
    conn: &Connection,
    old_name: &str,
    game: &Game,
    database_id: i64,
) -> Result<usize, PersistenceError> {
    let sql = format!(
        "UPDATE game SET {} WHERE name = ?{} AND database_id = ?{}",
        assignments(),
        GAME_FIELD_COUNT + 1,
        GAME_FIELD_COUNT + 2
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(storage_failure)?;
    let mut values = game_values(game);
    values.push(Value::Text(old_name.to_string()));
    values.push(Value::Integer(database_id));
    stmt.execute(params_from_iter(values))
        .map_err(|e| map_unique(e, || PersistenceError::GameAlreadyExists(game.name.clone())))
}

/// Delete games by name from one database. Returns how many rows went away.
pub(crate) fn delete_game_rows<'a>(
    conn: &Connection,
    names: impl IntoIterator<Item = &'a str>,
    database_id: i64,
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare_cached("DELETE FROM game WHERE name = ?1 AND database_id = ?2")?;
    let mut deleted = 0;
    for name in names {
        deleted += stmt.execute(params![name, database_id])?;
    }
    Ok(deleted)
}

/// All games of one database, ordered by name.
pub(crate) fn load_games(conn: &Connection, database_id: i64) -> rusqlite::Result<Vec<Game>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {GAME_FIELDS} FROM game WHERE database_id = ?1 ORDER BY name"
    ))?;
    let rows = stmt.query_map(params![database_id], row_to_game)?;
    rows.collect()
}

/// Names of every game in one database.
pub(crate) fn game_names(conn: &Connection, database_id: i64) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare_cached("SELECT name FROM game WHERE database_id = ?1")?;
    let rows = stmt.query_map(params![database_id], |row| row.get::<_, String>(0))?;
    rows.collect()
}

// ── Actions ─────────────────────────────────────────────────────────────────

/// Insert a batch of games into `database`, all or nothing.
///
/// A name already present in the database, or repeated within the batch,
/// fails the whole batch with [`PersistenceError::GameAlreadyExists`].
pub fn save_games(
    store: &CatalogStore,
    games: &[Game],
    database: &str,
) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, database);
        insert_games(conn, games, database_id)?;
        log::debug!("Saved {} game(s) into '{database}'", games.len());
        Ok(())
    })
}

/// Replace the game named `old_name` in `database` with `game`.
///
/// The new name may differ from the old one; it must not collide with another
/// game of the same database.
pub fn update_game(
    store: &CatalogStore,
    old_name: &str,
    game: &Game,
    database: &str,
) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, database);
        if update_game_row(conn, old_name, game, database_id)? == 0 {
            return Err(PersistenceError::GameNotFound(old_name.to_string()));
        }
        Ok(())
    })
}

/// Delete games by name. Names that are not present are ignored.
pub fn delete_games<'a>(
    store: &CatalogStore,
    names: impl IntoIterator<Item = &'a str>,
    database: &str,
) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, database);
        let deleted = delete_game_rows(conn, names, database_id).map_err(storage_failure)?;
        log::debug!("Deleted {deleted} game(s) from '{database}'");
        Ok(())
    })
}

/// Games of `database`, ordered by name.
///
/// An unknown database yields an empty list. Statement failures are logged and
/// also yield an empty list; only a store that cannot be reached is an error.
pub fn get_games(store: &CatalogStore, database: &str) -> Result<Vec<Game>, PersistenceError> {
    with_connection(store, |conn| {
        let database_id = resolve_database_id(conn, database);
        match load_games(conn, database_id) {
            Ok(games) => Ok(games),
            Err(e) => {
                log::warn!("Failed to load games of '{database}': {e}");
                Ok(Vec::new())
            }
        }
    })
}
