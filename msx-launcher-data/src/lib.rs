//! Launcher data model types and the extra-data file reader.
//!
//! This crate defines the catalog's data model without any database
//! dependencies. Consumers pass these types to `msx-launcher-db` for
//! persistence or serialize them for display.

pub mod extra_data;
pub mod types;

pub use extra_data::{
    extra_data_version, load_extra_data, parse_extra_data, ExtraDataError, EXTRA_DATA_FILENAME,
};
pub use types::*;
