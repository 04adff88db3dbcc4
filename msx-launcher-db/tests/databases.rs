use msx_launcher_data::types::Game;
use msx_launcher_db::*;
use tempfile::TempDir;

fn open() -> (TempDir, CatalogPersister) {
    let dir = TempDir::new().unwrap();
    let persister = CatalogPersister::open(dir.path().join("launcher.db")).unwrap();
    (dir, persister)
}

fn rom_game(name: &str) -> Game {
    let mut game = Game::new(name, "Boosted_MSX2_EN");
    game.rom_a = Some(format!("/roms/{name}.rom"));
    game
}

#[test]
fn create_and_list_databases() {
    let (_dir, persister) = open();
    assert!(persister.get_databases().is_empty());

    persister.create_database("Konami").unwrap();
    persister.create_database("Compile").unwrap();

    let names: Vec<_> = persister.get_databases().into_iter().collect();
    assert_eq!(names, vec!["Compile", "Konami"]);
}

#[test]
fn create_duplicate_database_fails() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    let err = persister.create_database("Konami").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseAlreadyExists);
}

#[test]
fn database_names_are_case_sensitive() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    persister.create_database("konami").unwrap();
    assert_eq!(persister.get_databases().len(), 2);
}

#[test]
fn create_empty_name_fails_before_store() {
    let (_dir, persister) = open();
    let err = persister.create_database("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseNullName);
    assert!(persister.get_databases().is_empty());
}

#[test]
fn rename_keeps_games() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    persister.save_game(&rom_game("Nemesis"), "Konami").unwrap();

    persister.rename_database("Konami", "Konami MSX").unwrap();

    assert!(persister.get_games("Konami").unwrap().is_empty());
    let games = persister.get_games("Konami MSX").unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].name, "Nemesis");
}

#[test]
fn rename_errors() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    persister.create_database("Compile").unwrap();

    let err = persister.rename_database("Missing", "Other").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseNotFound);

    let err = persister.rename_database("Konami", "Compile").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseAlreadyExists);

    let err = persister.rename_database("Konami", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseNullName);
}

#[test]
fn delete_cascades_to_games_and_backups() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    persister.save_game(&rom_game("Nemesis"), "Konami").unwrap();
    persister.backup_database("Konami").unwrap();

    persister.delete_database("Konami").unwrap();

    assert!(persister.get_databases().is_empty());
    let conn = persister.store().connect().unwrap();
    for table in ["game", "database_backup", "game_backup"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "{table} should be empty");
    }
}

#[test]
fn delete_missing_database_fails() {
    let (_dir, persister) = open();
    let err = persister.delete_database("Missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseNotFound);
}

#[test]
fn recreate_empties_database_but_keeps_it() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    persister
        .save_games(&[rom_game("Nemesis"), rom_game("Penguin Adventure")], "Konami")
        .unwrap();
    persister.backup_database("Konami").unwrap();

    persister.recreate_database("Konami").unwrap();

    assert!(persister.get_games("Konami").unwrap().is_empty());
    assert!(persister.get_databases().contains("Konami"));
    assert_eq!(persister.get_backups("Konami").len(), 1);
}

#[test]
fn resolve_unknown_database_is_zero() {
    let (_dir, persister) = open();
    persister.create_database("Konami").unwrap();
    let conn = persister.store().connect().unwrap();
    assert!(resolve_database_id(&conn, "Konami") > 0);
    assert_eq!(resolve_database_id(&conn, "Missing"), 0);
}
