//! Linking related titles to games present in the launcher.

use msx_launcher_data::types::{DatabaseItem, RelatedGame};
use rusqlite::{params, Connection, OptionalExtension};

use crate::action::with_connection;
use crate::error::PersistenceError;
use crate::store::CatalogStore;

/// Attach a launcher link to each related game that exists in some database,
/// matched by generation-msx id.
///
/// Lookup failures leave the affected entry unlinked; if the store cannot be
/// reached at all the input is returned as is.
pub fn get_related_games_with_launcher_links(
    store: &CatalogStore,
    related: &[RelatedGame],
) -> Vec<RelatedGame> {
    let result: Result<Vec<RelatedGame>, PersistenceError> = with_connection(store, |conn| {
        Ok(related.iter().map(|game| link(conn, game)).collect())
    });

    result.unwrap_or_else(|e| {
        log::warn!("Failed to look up related games: {e}");
        related.to_vec()
    })
}

fn link(conn: &Connection, related: &RelatedGame) -> RelatedGame {
    match find_by_msx_gen_id(conn, related.msx_gen_id) {
        Ok(Some(item)) => RelatedGame {
            launcher_link: Some(item),
            ..related.clone()
        },
        Ok(None) => related.clone(),
        Err(e) => {
            log::warn!("Failed to look up '{}': {e}", related.game_name);
            related.clone()
        }
    }
}

fn find_by_msx_gen_id(conn: &Connection, msx_gen_id: u32) -> rusqlite::Result<Option<DatabaseItem>> {
    conn.prepare_cached(
        "SELECT g.name, d.name FROM game g JOIN database d ON g.database_id = d.id
         WHERE g.msx_genid = ?1
         ORDER BY d.name, g.name
         LIMIT 1",
    )?
    .query_row(params![msx_gen_id], |row| {
        Ok(DatabaseItem {
            game_name: row.get(0)?,
            database_name: row.get(1)?,
        })
    })
    .optional()
}
