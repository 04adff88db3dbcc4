//! Application settings: `~/.config/msx-launcher/settings.toml`.
//!
//! The only setting read here is `persistence.database_file`, the location of
//! the launcher store. Other keys in the file are left untouched on save.

use std::io;
use std::path::{Path, PathBuf};

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("msx-launcher").join("settings.toml")
}

/// Store location used when neither the CLI nor the settings file names one.
pub(crate) fn default_database_file() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("msx-launcher")
        .join("databases")
        .join("launcher.db")
}

/// Resolve the store location using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `persistence.database_file` in `settings.toml`
/// 3. [`default_database_file`]
pub(crate) fn resolve_database_file(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    load_settings()
        .and_then(|doc| database_file_from(&doc))
        .unwrap_or_else(default_database_file)
}

fn load_settings() -> Option<toml::Value> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    contents.parse().ok()
}

fn database_file_from(doc: &toml::Value) -> Option<PathBuf> {
    let file = doc.get("persistence")?.get("database_file")?.as_str()?;
    if file.is_empty() {
        None
    } else {
        Some(PathBuf::from(file))
    }
}

/// Save the store location in `settings.toml`.
pub(crate) fn save_database_file(path: &Path) -> io::Result<()> {
    save_database_file_to(&settings_path(), path)
}

fn save_database_file_to(settings: &Path, path: &Path) -> io::Result<()> {
    let mut doc: toml::Value = match std::fs::read_to_string(settings) {
        Ok(contents) => contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default())),
        Err(_) => toml::Value::Table(Default::default()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let persistence = table
        .entry("persistence")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    persistence
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[persistence] is not a table"))?
        .insert(
            "database_file".to_string(),
            toml::Value::String(path.to_string_lossy().into_owned()),
        );

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// The settings file as pretty-printed TOML, if it exists and parses.
pub(crate) fn load_settings_string() -> Option<String> {
    toml::to_string_pretty(&load_settings()?).ok()
}
