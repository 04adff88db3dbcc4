//! Action framework: the two shapes every catalog operation runs in.
//!
//! A unit of work is a closure receiving a live connection. Writes run through
//! [`with_transaction`], which commits when the unit returns `Ok` and rolls
//! back otherwise. Reads run through [`with_connection`] and never open a
//! transaction boundary. Both open exactly one connection and release it on
//! every exit path.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::{storage_failure, PersistenceError};
use crate::store::CatalogStore;

/// Id returned for a database name that does not resolve. Row ids start at 1,
/// so statements keyed on it affect zero rows.
pub const UNRESOLVED_DATABASE_ID: i64 = 0;

/// Run `unit` inside one transaction on a fresh connection.
///
/// The transaction is IMMEDIATE so its write lock is taken before the first
/// read; checks made by the unit (e.g. backup counts) cannot be raced.
pub fn with_transaction<T, F>(store: &CatalogStore, unit: F) -> Result<T, PersistenceError>
where
    F: FnOnce(&Connection) -> Result<T, PersistenceError>,
{
    let mut conn = store.connect().map_err(storage_failure)?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(storage_failure)?;

    match unit(&tx) {
        Ok(value) => {
            tx.commit().map_err(storage_failure)?;
            Ok(value)
        }
        Err(e) => {
            log::debug!("Rolling back action: {e}");
            if let Err(rollback) = tx.rollback() {
                log::warn!("Rollback failed: {rollback}");
            }
            Err(e)
        }
    }
}

/// Run `unit` on a fresh connection without a transaction boundary.
pub fn with_connection<T, F>(store: &CatalogStore, unit: F) -> Result<T, PersistenceError>
where
    F: FnOnce(&Connection) -> Result<T, PersistenceError>,
{
    let conn = store.connect().map_err(storage_failure)?;
    unit(&conn)
}

/// Resolve a database name to its internal id.
///
/// Never fails: an unknown name, or a lookup failure, yields
/// [`UNRESOLVED_DATABASE_ID`] and the caller's own statements decide what
/// zero affected rows mean.
pub fn resolve_database_id(conn: &Connection, database: &str) -> i64 {
    let result = conn
        .query_row(
            "SELECT id FROM database WHERE name = ?1",
            params![database],
            |row| row.get::<_, i64>(0),
        )
        .optional();

    match result {
        Ok(Some(id)) => id,
        Ok(None) => UNRESOLVED_DATABASE_ID,
        Err(e) => {
            log::warn!("Failed to resolve database '{database}': {e}");
            UNRESOLVED_DATABASE_ID
        }
    }
}
