//! The catalog facade: one entry point for every persistence operation.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use msx_launcher_data::types::*;

use crate::error::PersistenceError;
use crate::extra_data::{ExtraDataBuilder, ExtraDataRefresher};
use crate::moves::MoveDecider;
use crate::store::CatalogStore;
use crate::{backups, databases, extra_data, favorites, finder, games, machines, moves, related};

/// Catalog persistence over one launcher store.
///
/// Arguments and games are validated before any store work happens; every
/// mutating call runs as a single transaction.
pub struct CatalogPersister {
    store: CatalogStore,
    extra_data_builder: Box<dyn ExtraDataBuilder>,
}

impl CatalogPersister {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        Ok(Self::new(CatalogStore::open(path)?))
    }

    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            extra_data_builder: Box::new(ExtraDataRefresher),
        }
    }

    /// Replace the builder used by [`Self::update_game_extra_data_in_databases`].
    pub fn with_extra_data_builder(mut self, builder: impl ExtraDataBuilder + 'static) -> Self {
        self.extra_data_builder = Box::new(builder);
        self
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    // ── Databases ───────────────────────────────────────────────────────────

    pub fn create_database(&self, name: &str) -> Result<(), PersistenceError> {
        require_database_name(name)?;
        databases::create_database(&self.store, name)
    }

    pub fn delete_database(&self, name: &str) -> Result<(), PersistenceError> {
        databases::delete_database(&self.store, name)
    }

    pub fn rename_database(&self, old_name: &str, new_name: &str) -> Result<(), PersistenceError> {
        require_database_name(new_name)?;
        databases::rename_database(&self.store, old_name, new_name)
    }

    /// Remove every game of `name`, keeping the database and its backups.
    pub fn recreate_database(&self, name: &str) -> Result<(), PersistenceError> {
        databases::recreate_database(&self.store, name)
    }

    pub fn get_databases(&self) -> BTreeSet<String> {
        databases::get_databases(&self.store)
    }

    // ── Backups ─────────────────────────────────────────────────────────────

    pub fn backup_database(&self, name: &str) -> Result<DatabaseBackup, PersistenceError> {
        backups::backup_database(&self.store, name)
    }

    /// Restore a backup over its database. The backup is consumed.
    pub fn restore_backup(&self, backup: &DatabaseBackup) -> Result<(), PersistenceError> {
        backups::restore_backup(&self.store, backup)
    }

    pub fn delete_backup(&self, backup: &DatabaseBackup) -> Result<(), PersistenceError> {
        backups::delete_backup(&self.store, backup)
    }

    pub fn get_backups(&self, name: &str) -> Vec<DatabaseBackup> {
        backups::get_backups(&self.store, name)
    }

    // ── Games ───────────────────────────────────────────────────────────────

    pub fn get_games(&self, database: &str) -> Result<Vec<Game>, PersistenceError> {
        games::get_games(&self.store, database)
    }

    pub fn save_game(&self, game: &Game, database: &str) -> Result<(), PersistenceError> {
        self.save_games(std::slice::from_ref(game), database)
    }

    /// Save a batch of games. Every game is validated before the store is
    /// touched, and the batch is stored all or nothing.
    pub fn save_games(&self, games: &[Game], database: &str) -> Result<(), PersistenceError> {
        games.iter().try_for_each(validate_game)?;
        games::save_games(&self.store, games, database)
    }

    /// Replace `old` (matched by name) with `new` in `database`.
    pub fn update_game(&self, old: &Game, new: &Game, database: &str) -> Result<(), PersistenceError> {
        validate_game(new)?;
        games::update_game(&self.store, &old.name, new, database)
    }

    pub fn delete_game(&self, game: &Game, database: &str) -> Result<(), PersistenceError> {
        self.delete_games(std::slice::from_ref(game), database)
    }

    pub fn delete_games(&self, games: &[Game], database: &str) -> Result<(), PersistenceError> {
        games::delete_games(&self.store, games.iter().map(|g| g.name.as_str()), database)
    }

    /// Move games between databases, asking `decider` about name conflicts.
    ///
    /// Returns the games that were moved.
    pub fn move_games(
        &self,
        games: &[Game],
        old_database: &str,
        new_database: &str,
        decider: &mut dyn MoveDecider,
    ) -> Result<Vec<Game>, PersistenceError> {
        moves::move_games(&self.store, games, old_database, new_database, decider)
    }

    /// Refresh derived fields of every game from `extra_data` (keyed by sha1).
    pub fn update_game_extra_data_in_databases(
        &self,
        extra_data: &HashMap<String, ExtraData>,
    ) -> Result<usize, PersistenceError> {
        extra_data::update_game_extra_data_in_databases(
            &self.store,
            extra_data,
            self.extra_data_builder.as_ref(),
        )
    }

    /// See [`machines::update_machine`].
    pub fn update_machine(
        &self,
        to: &str,
        from: Option<&str>,
        database: Option<&str>,
        backup_databases: bool,
    ) -> Result<usize, PersistenceError> {
        machines::update_machine(&self.store, to, from, database, backup_databases)
    }

    // ── Favorites and search ────────────────────────────────────────────────

    pub fn add_favorite(&self, favorite: &DatabaseItem) -> Result<(), PersistenceError> {
        favorites::add_favorite(&self.store, favorite)
    }

    pub fn delete_favorite(&self, favorite: &DatabaseItem) -> Result<(), PersistenceError> {
        favorites::delete_favorite(&self.store, favorite)
    }

    pub fn get_favorites(&self) -> BTreeSet<DatabaseItem> {
        favorites::get_favorites(&self.store)
    }

    /// See [`finder::find_games`].
    pub fn find_games(&self, text: &str, maximum_matches: usize) -> BTreeSet<DatabaseItem> {
        finder::find_games(&self.store, text, maximum_matches)
    }

    pub fn get_related_games_with_launcher_links(&self, related: &[RelatedGame]) -> Vec<RelatedGame> {
        related::get_related_games_with_launcher_links(&self.store, related)
    }
}

fn require_database_name(name: &str) -> Result<(), PersistenceError> {
    if name.is_empty() {
        return Err(PersistenceError::DatabaseNullName);
    }
    Ok(())
}

/// A game needs a name and something to launch.
pub fn validate_game(game: &Game) -> Result<(), PersistenceError> {
    if game.name.is_empty() {
        return Err(PersistenceError::GameWithNullName);
    }
    if !game.has_media() {
        return Err(PersistenceError::GameWithMissingMedia(game.name.clone()));
    }
    Ok(())
}
