use msx_launcher_db::schema::{create_schema, get_schema_version, CURRENT_VERSION};
use msx_launcher_db::*;
use rusqlite::Connection;
use tempfile::TempDir;

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("SELECT name FROM pragma_table_info('{table}')"))
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn open_creates_schema_and_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("launcher.db");
    let conn = open_database(&path).unwrap();
    assert!(path.exists());
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let conn = open_database(&dir.path().join("launcher.db")).unwrap();
    create_schema(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn store_connections_enable_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let store = CatalogStore::open(dir.path().join("launcher.db")).unwrap();
    let conn = store.connect().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let dir = TempDir::new().unwrap();
    let conn = open_database(&dir.path().join("launcher.db")).unwrap();
    for table in [
        "schema_version",
        "database",
        "game",
        "database_backup",
        "game_backup",
        "favorite",
    ] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table {table} should exist");
    }
}

#[test]
fn game_and_backup_tables_share_columns() {
    let dir = TempDir::new().unwrap();
    let conn = open_database(&dir.path().join("launcher.db")).unwrap();
    let game: Vec<String> = column_names(&conn, "game")
        .into_iter()
        .filter(|c| c != "database_id")
        .collect();
    let backup: Vec<String> = column_names(&conn, "game_backup")
        .into_iter()
        .filter(|c| c != "database_backup_id")
        .collect();
    assert_eq!(game, backup);
}

#[test]
fn migrates_version_one_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("launcher.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER NOT NULL, applied_at TEXT);
             INSERT INTO schema_version (version) VALUES (1);
             CREATE TABLE database (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE);
             CREATE TABLE game (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL, info TEXT, machine TEXT NOT NULL,
                 rom_a TEXT, extension_rom TEXT, rom_b TEXT, disk_a TEXT, disk_b TEXT,
                 tape TEXT, harddisk TEXT, laserdisc TEXT, tcl_script TEXT,
                 msx BOOLEAN NOT NULL DEFAULT 0, msx2 BOOLEAN NOT NULL DEFAULT 0,
                 msx2plus BOOLEAN NOT NULL DEFAULT 0, turbo_r BOOLEAN NOT NULL DEFAULT 0,
                 psg BOOLEAN NOT NULL DEFAULT 0, scc BOOLEAN NOT NULL DEFAULT 0,
                 scc_i BOOLEAN NOT NULL DEFAULT 0, pcm BOOLEAN NOT NULL DEFAULT 0,
                 msx_music BOOLEAN NOT NULL DEFAULT 0, msx_audio BOOLEAN NOT NULL DEFAULT 0,
                 moonsound BOOLEAN NOT NULL DEFAULT 0, midi BOOLEAN NOT NULL DEFAULT 0,
                 genre1 INTEGER NOT NULL DEFAULT 0, genre2 INTEGER NOT NULL DEFAULT 0,
                 msx_genid INTEGER NOT NULL DEFAULT 0, screenshot_suffix TEXT, sha1 TEXT,
                 size INTEGER NOT NULL DEFAULT 0,
                 database_id INTEGER NOT NULL REFERENCES database(id) ON DELETE CASCADE,
                 fdd_mode INTEGER NOT NULL DEFAULT 0,
                 tcl_script_override BOOLEAN NOT NULL DEFAULT 1,
                 UNIQUE(name, database_id));
             CREATE TABLE database_backup (
                 id INTEGER PRIMARY KEY AUTOINCREMENT, time INTEGER NOT NULL,
                 database_id INTEGER NOT NULL REFERENCES database(id) ON DELETE CASCADE,
                 UNIQUE(database_id, time));
             CREATE TABLE game_backup (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL, info TEXT, machine TEXT NOT NULL,
                 rom_a TEXT, extension_rom TEXT, rom_b TEXT, disk_a TEXT, disk_b TEXT,
                 tape TEXT, harddisk TEXT, laserdisc TEXT, tcl_script TEXT,
                 msx BOOLEAN NOT NULL DEFAULT 0, msx2 BOOLEAN NOT NULL DEFAULT 0,
                 msx2plus BOOLEAN NOT NULL DEFAULT 0, turbo_r BOOLEAN NOT NULL DEFAULT 0,
                 psg BOOLEAN NOT NULL DEFAULT 0, scc BOOLEAN NOT NULL DEFAULT 0,
                 scc_i BOOLEAN NOT NULL DEFAULT 0, pcm BOOLEAN NOT NULL DEFAULT 0,
                 msx_music BOOLEAN NOT NULL DEFAULT 0, msx_audio BOOLEAN NOT NULL DEFAULT 0,
                 moonsound BOOLEAN NOT NULL DEFAULT 0, midi BOOLEAN NOT NULL DEFAULT 0,
                 genre1 INTEGER NOT NULL DEFAULT 0, genre2 INTEGER NOT NULL DEFAULT 0,
                 msx_genid INTEGER NOT NULL DEFAULT 0, screenshot_suffix TEXT, sha1 TEXT,
                 size INTEGER NOT NULL DEFAULT 0,
                 database_backup_id INTEGER NOT NULL REFERENCES database_backup(id) ON DELETE CASCADE,
                 fdd_mode INTEGER NOT NULL DEFAULT 0,
                 tcl_script_override BOOLEAN NOT NULL DEFAULT 1);
             INSERT INTO database (name) VALUES ('Konami');
             INSERT INTO game (name, machine, rom_a, database_id)
                 VALUES ('Nemesis', 'Boosted_MSX2_EN', '/roms/nemesis.rom', 1);",
        )
        .unwrap();
    }

    let persister = CatalogPersister::open(&path).unwrap();
    let conn = persister.store().connect().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    assert!(column_names(&conn, "game").contains(&"input_device".to_string()));
    assert!(column_names(&conn, "game_backup").contains(&"connect_gfx9000".to_string()));
    assert_eq!(column_names(&conn, "favorite"), vec!["id", "game_id"]);

    let games = persister.get_games("Konami").unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].name, "Nemesis");
    assert!(!games[0].connect_gfx9000);
    assert!(games[0].tcl_script_override);
}

#[test]
fn newer_store_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("launcher.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION + 1],
        )
        .unwrap();
    }

    match CatalogStore::open(&path) {
        Err(SchemaError::VersionMismatch { expected, found }) => {
            assert_eq!(expected, CURRENT_VERSION);
            assert_eq!(found, CURRENT_VERSION + 1);
        }
        other => panic!("expected version mismatch, got {other:?}"),
    }

    let err = CatalogPersister::open(&path).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Io);
}
