//! Store gateway: owns the location of the embedded store and hands out one
//! connection per action.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::schema::{self, SchemaError};

/// Handle to the launcher's embedded store.
///
/// Holds only the file location; no connection outlives a single action.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Open the store at `path`, creating or migrating the schema.
    ///
    /// Must be called once before any action runs against the file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        let path = path.into();
        // The initialising connection is closed on return.
        schema::open_database(&path)?;
        log::debug!("Launcher store ready at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection for one action.
    pub fn connect(&self) -> Result<Connection, rusqlite::Error> {
        schema::connect(&self.path)
    }
}
