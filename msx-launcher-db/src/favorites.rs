//! Favorite games.
//!
//! A favorite points at a game row, not at a name: it follows the game when
//! the game is renamed or moved to another database, and disappears with the
//! row when the game is deleted, replaced by a move, or wiped by a restore.

use std::collections::BTreeSet;

use msx_launcher_data::types::DatabaseItem;
use rusqlite::{params, Connection};

use crate::action::{resolve_database_id, with_connection, with_transaction, UNRESOLVED_DATABASE_ID};
use crate::error::{map_unique, storage_failure, PersistenceError};
use crate::store::CatalogStore;

/// Mark a game as favorite.
pub fn add_favorite(store: &CatalogStore, favorite: &DatabaseItem) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, &favorite.database_name);
        if database_id == UNRESOLVED_DATABASE_ID {
            return Err(PersistenceError::DatabaseNotFound(
                favorite.database_name.clone(),
            ));
        }

        let inserted = conn
            .execute(
                "INSERT INTO favorite (game_id)
                 SELECT id FROM game WHERE name = ?1 AND database_id = ?2",
                params![favorite.game_name, database_id],
            )
            .map_err(|e| {
                map_unique(e, || PersistenceError::FavoriteAlreadyExists {
                    game: favorite.game_name.clone(),
                    database: favorite.database_name.clone(),
                })
            })?;
        if inserted == 0 {
            return Err(PersistenceError::GameNotFound(favorite.game_name.clone()));
        }

        log::debug!(
            "Added favorite '{}' of '{}'",
            favorite.game_name,
            favorite.database_name
        );
        Ok(())
    })
}

/// Remove a favorite. Removing one that does not exist is not an error.
pub fn delete_favorite(store: &CatalogStore, favorite: &DatabaseItem) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let deleted = conn
            .execute(
                "DELETE FROM favorite WHERE game_id IN (
                     SELECT g.id FROM game g JOIN database d ON g.database_id = d.id
                     WHERE g.name = ?1 AND d.name = ?2)",
                params![favorite.game_name, favorite.database_name],
            )
            .map_err(storage_failure)?;
        log::debug!(
            "Removed {deleted} favorite(s) for '{}' of '{}'",
            favorite.game_name,
            favorite.database_name
        );
        Ok(())
    })
}

/// Every favorite, across all databases.
///
/// Never fails: a store or statement failure is logged and yields an empty
/// set.
pub fn get_favorites(store: &CatalogStore) -> BTreeSet<DatabaseItem> {
    with_connection(store, |conn| favorite_items(conn).map_err(PersistenceError::from))
        .unwrap_or_else(|e| {
            log::warn!("Failed to list favorites: {e}");
            BTreeSet::new()
        })
}

fn favorite_items(conn: &Connection) -> rusqlite::Result<BTreeSet<DatabaseItem>> {
    let mut stmt = conn.prepare_cached(
        "SELECT g.name, d.name FROM favorite f
         JOIN game g ON f.game_id = g.id
         JOIN database d ON g.database_id = d.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DatabaseItem {
            game_name: row.get(0)?,
            database_name: row.get(1)?,
        })
    })?;
    rows.collect()
}
