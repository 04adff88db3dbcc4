//! SQLite persistence layer for the MSX launcher catalog.
//!
//! Games are grouped into named databases, each with up to ten backups.
//! Any game can be marked as a favorite, and games can be searched across
//! all databases.
//! Every operation runs as one action on its own connection: writes inside a
//! single transaction, reads without one. [`CatalogPersister`] is the entry
//! point; the per-area modules expose the same actions as free functions over
//! a [`CatalogStore`].

pub mod action;
pub mod backups;
pub mod databases;
pub mod error;
pub mod extra_data;
pub mod favorites;
pub mod finder;
pub mod games;
pub mod machines;
pub mod moves;
pub mod persister;
pub mod related;
pub mod schema;
pub mod store;

pub use action::{resolve_database_id, with_connection, with_transaction};
pub use backups::MAX_BACKUPS;
pub use error::{ErrorKind, PersistenceError};
pub use extra_data::{ExtraDataBuilder, ExtraDataRefresher};
pub use moves::{MoveDecider, MoveDecision};
pub use persister::{validate_game, CatalogPersister};
pub use schema::{open_database, SchemaError, CURRENT_VERSION};
pub use store::CatalogStore;
