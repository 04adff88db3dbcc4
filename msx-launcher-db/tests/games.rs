use msx_launcher_data::types::*;
use msx_launcher_db::*;
use tempfile::TempDir;

fn open_with(databases: &[&str]) -> (TempDir, CatalogPersister) {
    let dir = TempDir::new().unwrap();
    let persister = CatalogPersister::open(dir.path().join("launcher.db")).unwrap();
    for name in databases {
        persister.create_database(name).unwrap();
    }
    (dir, persister)
}

fn rom_game(name: &str) -> Game {
    let mut game = Game::new(name, "Boosted_MSX2_EN");
    game.rom_a = Some(format!("/roms/{name}.rom"));
    game
}

fn full_game() -> Game {
    Game {
        name: "Metal Gear 2".to_string(),
        info: Some("http://www.generation-msx.nl/msxdb/softwareinfo/219".to_string()),
        machine: "Panasonic_FS-A1GT".to_string(),
        rom_a: Some("/roms/mg2.rom".to_string()),
        rom_b: Some("/roms/mg2b.rom".to_string()),
        extension_rom: Some("scc".to_string()),
        disk_a: Some("/disks/a.dsk".to_string()),
        disk_b: Some("/disks/b.dsk".to_string()),
        tape: Some("/tapes/t.cas".to_string()),
        harddisk: Some("/hd/h.dsk".to_string()),
        laserdisc: Some("/ld/l.ogv".to_string()),
        tcl_script: Some("/scripts/s.tcl".to_string()),
        generations: Generations {
            msx: false,
            msx2: true,
            msx2plus: true,
            turbo_r: true,
        },
        sound_chips: SoundChips {
            psg: true,
            scc: true,
            scc_i: false,
            pcm: true,
            msx_music: false,
            msx_audio: true,
            moonsound: false,
            midi: true,
        },
        genre1: 4,
        genre2: 19,
        msx_gen_id: 219,
        screenshot_suffix: Some("b".to_string()),
        sha1: Some("0123456789abcdef0123456789abcdef01234567".to_string()),
        size: 524_288,
        fdd_mode: FddMode::DisableSecond,
        tcl_script_override: false,
        input_device: InputDevice::Mouse,
        connect_gfx9000: true,
    }
}

#[test]
fn save_and_get_round_trip() {
    let (_dir, persister) = open_with(&["Konami"]);
    let game = full_game();
    persister.save_game(&game, "Konami").unwrap();

    let games = persister.get_games("Konami").unwrap();
    assert_eq!(games, vec![game]);
}

#[test]
fn extreme_sizes_round_trip() {
    let (_dir, persister) = open_with(&["Konami"]);
    let mut big = rom_game("Big");
    big.size = i64::MAX;
    let mut small = rom_game("Small");
    small.size = i64::MIN;
    persister.save_games(&[big.clone(), small.clone()], "Konami").unwrap();

    let games = persister.get_games("Konami").unwrap();
    assert_eq!(games, vec![big, small]);
}

#[test]
fn get_games_is_ordered_by_name() {
    let (_dir, persister) = open_with(&["Konami"]);
    persister
        .save_games(&[rom_game("Vampire Killer"), rom_game("Gradius"), rom_game("Knightmare")], "Konami")
        .unwrap();

    let names: Vec<_> = persister
        .get_games("Konami")
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Gradius", "Knightmare", "Vampire Killer"]);
}

#[test]
fn get_games_of_unknown_database_is_empty() {
    let (_dir, persister) = open_with(&[]);
    assert!(persister.get_games("Missing").unwrap().is_empty());
}

#[test]
fn same_name_allowed_in_different_databases() {
    let (_dir, persister) = open_with(&["Konami", "Favourites"]);
    persister.save_game(&rom_game("Nemesis"), "Konami").unwrap();
    persister.save_game(&rom_game("Nemesis"), "Favourites").unwrap();
    assert_eq!(persister.get_games("Favourites").unwrap().len(), 1);
}

#[test]
fn save_existing_game_fails() {
    let (_dir, persister) = open_with(&["Konami"]);
    persister.save_game(&rom_game("Nemesis"), "Konami").unwrap();
    let err = persister.save_game(&rom_game("Nemesis"), "Konami").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameAlreadyExists);
    assert_eq!(err.to_string(), "Game 'Nemesis' already exists");
}

#[test]
fn duplicate_in_batch_stores_nothing() {
    let (_dir, persister) = open_with(&["Konami"]);
    let batch = [rom_game("Nemesis"), rom_game("Gradius 2"), rom_game("Nemesis")];
    let err = persister.save_games(&batch, "Konami").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameAlreadyExists);
    assert!(persister.get_games("Konami").unwrap().is_empty());
}

#[test]
fn invalid_game_in_batch_stores_nothing() {
    let (_dir, persister) = open_with(&["Konami"]);

    let batch = [rom_game("Nemesis"), Game::new("No Media", "msx")];
    let err = persister.save_games(&batch, "Konami").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameWithMissingMedia);

    let mut unnamed = rom_game("x");
    unnamed.name = String::new();
    let err = persister.save_games(&[rom_game("Nemesis"), unnamed], "Konami").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameWithNullName);

    assert!(persister.get_games("Konami").unwrap().is_empty());
}

#[test]
fn script_only_game_is_valid() {
    let (_dir, persister) = open_with(&["Scripts"]);
    let mut game = Game::new("Boot Script", "msx2");
    game.tcl_script = Some("/scripts/boot.tcl".to_string());
    persister.save_game(&game, "Scripts").unwrap();
}

#[test]
fn save_into_unknown_database_is_io() {
    let (_dir, persister) = open_with(&[]);
    let err = persister.save_game(&rom_game("Nemesis"), "Missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn update_replaces_fields_and_name() {
    let (_dir, persister) = open_with(&["Konami"]);
    let old = rom_game("Nemesis");
    persister.save_game(&old, "Konami").unwrap();

    let mut new = full_game();
    new.name = "Nemesis 2".to_string();
    persister.update_game(&old, &new, "Konami").unwrap();

    assert_eq!(persister.get_games("Konami").unwrap(), vec![new]);
}

#[test]
fn update_missing_game_fails() {
    let (_dir, persister) = open_with(&["Konami"]);
    let err = persister
        .update_game(&rom_game("Missing"), &rom_game("Missing"), "Konami")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameNotFound);
}

#[test]
fn update_onto_existing_name_fails() {
    let (_dir, persister) = open_with(&["Konami"]);
    persister
        .save_games(&[rom_game("Nemesis"), rom_game("Gradius 2")], "Konami")
        .unwrap();
    let err = persister
        .update_game(&rom_game("Nemesis"), &rom_game("Gradius 2"), "Konami")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameAlreadyExists);
}

#[test]
fn update_validates_new_game() {
    let (_dir, persister) = open_with(&["Konami"]);
    persister.save_game(&rom_game("Nemesis"), "Konami").unwrap();
    let err = persister
        .update_game(&rom_game("Nemesis"), &Game::new("Nemesis", "msx"), "Konami")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameWithMissingMedia);
    assert_eq!(persister.get_games("Konami").unwrap(), vec![rom_game("Nemesis")]);
}

#[test]
fn delete_games_ignores_missing() {
    let (_dir, persister) = open_with(&["Konami"]);
    persister
        .save_games(&[rom_game("Nemesis"), rom_game("Gradius 2"), rom_game("Salamander")], "Konami")
        .unwrap();

    persister
        .delete_games(&[rom_game("Nemesis"), rom_game("Not There")], "Konami")
        .unwrap();
    persister.delete_game(&rom_game("Salamander"), "Konami").unwrap();

    assert_eq!(persister.get_games("Konami").unwrap(), vec![rom_game("Gradius 2")]);
}

#[test]
fn out_of_range_enums_decode_to_defaults() {
    let (_dir, persister) = open_with(&["Konami"]);
    persister.save_game(&rom_game("Nemesis"), "Konami").unwrap();
    let conn = persister.store().connect().unwrap();
    conn.execute("UPDATE game SET fdd_mode = 9, input_device = 42", [])
        .unwrap();

    let game = &persister.get_games("Konami").unwrap()[0];
    assert_eq!(game.fdd_mode, FddMode::EnableBoth);
    assert_eq!(game.input_device, InputDevice::None);
}
