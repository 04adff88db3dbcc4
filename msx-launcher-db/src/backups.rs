//! Database backups: point-in-time snapshots of a database's games.
//!
//! A backup is a marker row in `database_backup` plus a copy of every game row
//! in `game_backup`. Callers address a backup by database name and timestamp;
//! the marker id stays inside this module. Timestamps are stored in
//! milliseconds and are unique per database.

use chrono::{DateTime, Utc};
use msx_launcher_data::types::DatabaseBackup;
use rusqlite::{params, Connection, OptionalExtension};

use crate::action::{resolve_database_id, with_connection, with_transaction};
use crate::error::{storage_failure, PersistenceError};
use crate::games::GAME_FIELDS;
use crate::store::CatalogStore;

/// Most backups a single database may hold.
pub const MAX_BACKUPS: usize = 10;

/// Snapshot `database` and return the new backup.
pub fn backup_database(
    store: &CatalogStore,
    database: &str,
) -> Result<DatabaseBackup, PersistenceError> {
    with_transaction(store, |conn| backup_database_in(conn, database))
}

/// Snapshot `database` inside an already open unit of work.
pub(crate) fn backup_database_in(
    conn: &Connection,
    database: &str,
) -> Result<DatabaseBackup, PersistenceError> {
    let database_id = resolve_database_id(conn, database);

    let count: usize = conn
        .query_row(
            "SELECT COUNT(*) FROM database_backup WHERE database_id = ?1",
            params![database_id],
            |row| row.get(0),
        )
        .map_err(storage_failure)?;
    if count >= MAX_BACKUPS {
        return Err(PersistenceError::DatabaseMaxBackupsReached(
            database.to_string(),
        ));
    }

    let latest: Option<i64> = conn
        .query_row(
            "SELECT MAX(time) FROM database_backup WHERE database_id = ?1",
            params![database_id],
            |row| row.get(0),
        )
        .map_err(storage_failure)?;
    let now = Utc::now().timestamp_millis();
    let time = match latest {
        Some(last) if last >= now => last + 1,
        _ => now,
    };

    conn.execute(
        "INSERT INTO database_backup (time, database_id) VALUES (?1, ?2)",
        params![time, database_id],
    )
    .map_err(storage_failure)?;
    let backup_id = conn.last_insert_rowid();

    let copied = conn
        .execute(
            &format!(
                "INSERT INTO game_backup ({GAME_FIELDS}, database_backup_id)
                 SELECT {GAME_FIELDS}, ?1 FROM game WHERE database_id = ?2"
            ),
            params![backup_id, database_id],
        )
        .map_err(storage_failure)?;

    log::info!("Backed up database '{database}' ({copied} game(s))");
    Ok(DatabaseBackup::new(database, from_millis(time)))
}

/// Replace the games of the backup's database with the snapshot, then drop
/// the backup.
pub fn restore_backup(store: &CatalogStore, backup: &DatabaseBackup) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, &backup.database);

        // Cleared first; a missing backup rolls this back with the transaction.
        conn.execute("DELETE FROM game WHERE database_id = ?1", params![database_id])
            .map_err(storage_failure)?;

        let backup_id = find_backup_id(conn, database_id, &backup.timestamp)
            .map_err(storage_failure)?
            .ok_or_else(|| PersistenceError::BackupNotFound {
                database: backup.database.clone(),
                timestamp: backup.timestamp,
            })?;

        let restored = conn
            .execute(
                &format!(
                    "INSERT INTO game ({GAME_FIELDS}, database_id)
                     SELECT {GAME_FIELDS}, ?1 FROM game_backup WHERE database_backup_id = ?2"
                ),
                params![database_id, backup_id],
            )
            .map_err(storage_failure)?;

        conn.execute("DELETE FROM database_backup WHERE id = ?1", params![backup_id])
            .map_err(storage_failure)?;

        log::info!(
            "Restored database '{}' from backup of {} ({restored} game(s))",
            backup.database,
            backup.timestamp
        );
        Ok(())
    })
}

/// Delete a backup. Deleting a backup that does not exist is not an error.
pub fn delete_backup(store: &CatalogStore, backup: &DatabaseBackup) -> Result<(), PersistenceError> {
    with_transaction(store, |conn| {
        let database_id = resolve_database_id(conn, &backup.database);
        conn.execute(
            "DELETE FROM database_backup WHERE database_id = ?1 AND time = ?2",
            params![database_id, backup.timestamp.timestamp_millis()],
        )
        .map_err(storage_failure)?;
        Ok(())
    })
}

/// Backups of `database`, oldest first. Failures yield an empty list.
pub fn get_backups(store: &CatalogStore, database: &str) -> Vec<DatabaseBackup> {
    let result: Result<Vec<DatabaseBackup>, PersistenceError> = with_connection(store, |conn| {
        let database_id = resolve_database_id(conn, database);
        let mut stmt = conn.prepare_cached(
            "SELECT time FROM database_backup WHERE database_id = ?1 ORDER BY time",
        )?;
        let times = stmt
            .query_map(params![database_id], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(times
            .into_iter()
            .map(|time| DatabaseBackup::new(database, from_millis(time)))
            .collect())
    });

    result.unwrap_or_else(|e| {
        log::warn!("Failed to list backups of '{database}': {e}");
        Vec::new()
    })
}

fn find_backup_id(
    conn: &Connection,
    database_id: i64,
    timestamp: &DateTime<Utc>,
) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM database_backup WHERE database_id = ?1 AND time = ?2",
        params![database_id, timestamp.timestamp_millis()],
        |row| row.get(0),
    )
    .optional()
}

fn from_millis(time: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time).unwrap_or_default()
}
