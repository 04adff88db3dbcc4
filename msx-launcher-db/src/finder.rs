//! Searching games across every database.

use std::collections::BTreeSet;

use msx_launcher_data::types::DatabaseItem;
use rusqlite::{params, Connection};

use crate::action::with_connection;
use crate::error::PersistenceError;
use crate::store::CatalogStore;

/// Games whose name contains `text` (ignoring case), or whose sha1 contains
/// it, in any database. At most `maximum_matches` hits are returned.
///
/// Never fails: blank text, a zero limit and store failures all yield an
/// empty set.
pub fn find_games(store: &CatalogStore, text: &str, maximum_matches: usize) -> BTreeSet<DatabaseItem> {
    if text.trim().is_empty() || maximum_matches == 0 {
        return BTreeSet::new();
    }

    with_connection(store, |conn| {
        find_matches(conn, text, maximum_matches).map_err(PersistenceError::from)
    })
    .unwrap_or_else(|e| {
        log::warn!("Game search for '{text}' failed: {e}");
        BTreeSet::new()
    })
}

fn find_matches(conn: &Connection, text: &str, limit: usize) -> rusqlite::Result<BTreeSet<DatabaseItem>> {
    let pattern = format!("%{}%", escape_like(text));
    let sha1_pattern = pattern.to_lowercase();
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut stmt = conn.prepare_cached(
        "SELECT g.name, d.name FROM game g JOIN database d ON g.database_id = d.id
         WHERE UPPER(g.name) LIKE UPPER(?1) ESCAPE '\\'
            OR g.sha1 LIKE ?2 ESCAPE '\\'
         ORDER BY g.name, d.name
         LIMIT ?3",
    )?;
    let rows = stmt.query_map(params![pattern, sha1_pattern, limit], |row| {
        Ok(DatabaseItem {
            game_name: row.get(0)?,
            database_name: row.get(1)?,
        })
    })?;
    rows.collect()
}

/// Make `%` and `_` in user text match themselves.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
