//! Database lifecycle actions.

use std::collections::BTreeSet;

use rusqlite::{params, Connection};

use crate::action::{resolve_database_id, with_connection, with_transaction};
use crate::error::{map_unique, storage_failure, PersistenceError};
use crate::games::{delete_game_rows, load_games};
use crate::store::CatalogStore;

/// Create an empty database.
pub fn create_database(store: &CatalogStore, name: &str) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        conn.execute("INSERT INTO database (name) VALUES (?1)", params![name])
            .map_err(|e| map_unique(e, || PersistenceError::DatabaseAlreadyExists(name.to_string())))?;
        log::debug!("Created database '{name}'");
        Ok(())
    })
}

/// Rename a database, keeping its games and backups.
pub fn rename_database(
    store: &CatalogStore,
    old_name: &str,
    new_name: &str,
) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let changed = conn
            .execute(
                "UPDATE database SET name = ?1 WHERE name = ?2",
                params![new_name, old_name],
            )
            .map_err(|e| {
                map_unique(e, || PersistenceError::DatabaseAlreadyExists(new_name.to_string()))
            })?;
        if changed == 0 {
            return Err(PersistenceError::DatabaseNotFound(old_name.to_string()));
        }
        log::debug!("Renamed database '{old_name}' to '{new_name}'");
        Ok(())
    })
}

/// Delete a database together with its games and backups.
pub fn delete_database(store: &CatalogStore, name: &str) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let deleted = conn
            .execute("DELETE FROM database WHERE name = ?1", params![name])
            .map_err(storage_failure)?;
        if deleted == 0 {
            return Err(PersistenceError::DatabaseNotFound(name.to_string()));
        }
        log::debug!("Deleted database '{name}'");
        Ok(())
    })
}

/// Empty a database of all its games. The database itself and its backups
/// stay.
pub fn recreate_database(store: &CatalogStore, name: &str) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, name);
        let games = load_games(conn, database_id).map_err(storage_failure)?;
        let deleted = delete_game_rows(conn, games.iter().map(|g| g.name.as_str()), database_id)
            .map_err(storage_failure)?;
        log::debug!("Recreated database '{name}', {deleted} game(s) removed");
        Ok(())
    })
}

/// Names of every database.
///
/// Never fails: a store or statement failure is logged and yields an empty
/// set.
pub fn get_databases(store: &CatalogStore) -> BTreeSet<String> {
    with_connection(store, |conn| database_names(conn).map_err(PersistenceError::from))
        .unwrap_or_else(|e| {
            log::warn!("Failed to list databases: {e}");
            BTreeSet::new()
        })
}

pub(crate) fn database_names(conn: &Connection) -> rusqlite::Result<BTreeSet<String>> {
    let mut stmt = conn.prepare_cached("SELECT name FROM database")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}
