//! SQLite schema creation and migration.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
///
/// Version 1 predates the `input_device` and `connect_gfx9000` game columns;
/// version 2 predates the `favorite` table.
pub const CURRENT_VERSION: i32 = 3;

/// Milliseconds to wait on a locked store before failing a statement.
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent, safe to call on an existing store.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(FAVORITE_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open a connection with the per-connection settings every action relies on.
///
/// Foreign keys are off by default in SQLite and must be enabled on each
/// connection for the database -> game/backup cascades to fire.
pub fn connect(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Open or create a launcher store at the given path, creating or migrating
/// the schema as needed.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = connect(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        log::debug!("Creating launcher schema in {}", path.display());
        create_schema(&conn)?;
    } else if version != CURRENT_VERSION {
        migrate(&conn, version)?;
    }

    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    let mut version = from_version;
    while version < CURRENT_VERSION {
        log::info!("Migrating launcher store from schema version {version}");
        if version == 1 {
            conn.execute_batch(
                "ALTER TABLE game ADD COLUMN input_device INTEGER NOT NULL DEFAULT 0;
                 ALTER TABLE game ADD COLUMN connect_gfx9000 BOOLEAN NOT NULL DEFAULT 0;
                 ALTER TABLE game_backup ADD COLUMN input_device INTEGER NOT NULL DEFAULT 0;
                 ALTER TABLE game_backup ADD COLUMN connect_gfx9000 BOOLEAN NOT NULL DEFAULT 0;",
            )?;
        }
        if version == 2 {
            conn.execute_batch(FAVORITE_SQL)?;
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Named game collections
CREATE TABLE IF NOT EXISTS database (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Games, unique by name within a database
CREATE TABLE IF NOT EXISTS game (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    info TEXT,
    machine TEXT NOT NULL,
    rom_a TEXT,
    extension_rom TEXT,
    rom_b TEXT,
    disk_a TEXT,
    disk_b TEXT,
    tape TEXT,
    harddisk TEXT,
    laserdisc TEXT,
    tcl_script TEXT,
    msx BOOLEAN NOT NULL DEFAULT 0,
    msx2 BOOLEAN NOT NULL DEFAULT 0,
    msx2plus BOOLEAN NOT NULL DEFAULT 0,
    turbo_r BOOLEAN NOT NULL DEFAULT 0,
    psg BOOLEAN NOT NULL DEFAULT 0,
    scc BOOLEAN NOT NULL DEFAULT 0,
    scc_i BOOLEAN NOT NULL DEFAULT 0,
    pcm BOOLEAN NOT NULL DEFAULT 0,
    msx_music BOOLEAN NOT NULL DEFAULT 0,
    msx_audio BOOLEAN NOT NULL DEFAULT 0,
    moonsound BOOLEAN NOT NULL DEFAULT 0,
    midi BOOLEAN NOT NULL DEFAULT 0,
    genre1 INTEGER NOT NULL DEFAULT 0,
    genre2 INTEGER NOT NULL DEFAULT 0,
    msx_genid INTEGER NOT NULL DEFAULT 0,
    screenshot_suffix TEXT,
    sha1 TEXT,
    size INTEGER NOT NULL DEFAULT 0,
    database_id INTEGER NOT NULL REFERENCES database(id) ON DELETE CASCADE,
    fdd_mode INTEGER NOT NULL DEFAULT 0,
    tcl_script_override BOOLEAN NOT NULL DEFAULT 1,
    input_device INTEGER NOT NULL DEFAULT 0,
    connect_gfx9000 BOOLEAN NOT NULL DEFAULT 0,
    UNIQUE(name, database_id)
);
CREATE INDEX IF NOT EXISTS idx_game_database ON game(database_id);
CREATE INDEX IF NOT EXISTS idx_game_msx_genid ON game(msx_genid);

-- Backup markers, at most ten per database
CREATE TABLE IF NOT EXISTS database_backup (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time INTEGER NOT NULL,
    database_id INTEGER NOT NULL REFERENCES database(id) ON DELETE CASCADE,
    UNIQUE(database_id, time)
);

-- Snapshot rows, owned by a backup marker
CREATE TABLE IF NOT EXISTS game_backup (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    info TEXT,
    machine TEXT NOT NULL,
    rom_a TEXT,
    extension_rom TEXT,
    rom_b TEXT,
    disk_a TEXT,
    disk_b TEXT,
    tape TEXT,
    harddisk TEXT,
    laserdisc TEXT,
    tcl_script TEXT,
    msx BOOLEAN NOT NULL DEFAULT 0,
    msx2 BOOLEAN NOT NULL DEFAULT 0,
    msx2plus BOOLEAN NOT NULL DEFAULT 0,
    turbo_r BOOLEAN NOT NULL DEFAULT 0,
    psg BOOLEAN NOT NULL DEFAULT 0,
    scc BOOLEAN NOT NULL DEFAULT 0,
    scc_i BOOLEAN NOT NULL DEFAULT 0,
    pcm BOOLEAN NOT NULL DEFAULT 0,
    msx_music BOOLEAN NOT NULL DEFAULT 0,
    msx_audio BOOLEAN NOT NULL DEFAULT 0,
    moonsound BOOLEAN NOT NULL DEFAULT 0,
    midi BOOLEAN NOT NULL DEFAULT 0,
    genre1 INTEGER NOT NULL DEFAULT 0,
    genre2 INTEGER NOT NULL DEFAULT 0,
    msx_genid INTEGER NOT NULL DEFAULT 0,
    screenshot_suffix TEXT,
    sha1 TEXT,
    size INTEGER NOT NULL DEFAULT 0,
    database_backup_id INTEGER NOT NULL REFERENCES database_backup(id) ON DELETE CASCADE,
    fdd_mode INTEGER NOT NULL DEFAULT 0,
    tcl_script_override BOOLEAN NOT NULL DEFAULT 1,
    input_device INTEGER NOT NULL DEFAULT 0,
    connect_gfx9000 BOOLEAN NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_game_backup_owner ON game_backup(database_backup_id);
"#;

const FAVORITE_SQL: &str = r#"
-- Favorite games, dropped with the game row they point at
CREATE TABLE IF NOT EXISTS favorite (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL UNIQUE REFERENCES game(id) ON DELETE CASCADE
);
"#;
