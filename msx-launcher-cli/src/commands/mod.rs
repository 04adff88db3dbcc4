pub(crate) mod backup;
pub(crate) mod config;
pub(crate) mod database;
pub(crate) mod extra_data;
pub(crate) mod favorite;
pub(crate) mod games;
pub(crate) mod machine;
