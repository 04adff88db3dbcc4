//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "msx-launcher")]
#[command(about = "Manage MSX launcher game databases", long_about = None)]
pub(crate) struct Cli {
    /// Launcher store to use (overrides settings.toml)
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create, rename, delete and list databases
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Snapshot and restore databases
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// List, search, import, delete and move games
    Games {
        #[command(subcommand)]
        action: GamesAction,
    },

    /// Mark, unmark and list favorite games
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Refresh derived game fields from an extra-data file
    ExtraData {
        #[command(subcommand)]
        action: ExtraDataAction,
    },

    /// Reassign the machine games launch on
    Machine {
        #[command(subcommand)]
        action: MachineAction,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum DbAction {
    /// List all databases
    List,

    /// Create an empty database
    Create { name: String },

    /// Delete a database with its games and backups
    Delete { name: String },

    /// Rename a database
    Rename { old: String, new: String },

    /// Remove every game from a database, keeping the database
    Recreate { name: String },
}

#[derive(Subcommand)]
pub(crate) enum BackupAction {
    /// Back up a database
    Create { database: String },

    /// List the backups of a database
    List { database: String },

    /// Restore a backup over its database (the backup is consumed)
    Restore {
        database: String,
        /// Backup timestamp as shown by `backup list` (RFC 3339)
        timestamp: String,
    },

    /// Delete a backup
    Delete {
        database: String,
        /// Backup timestamp as shown by `backup list` (RFC 3339)
        timestamp: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum GamesAction {
    /// List the games of a database
    List {
        database: String,

        /// Print games as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search every database by game name or sha1
    Find {
        text: String,

        /// Maximum number of matches to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Save games from a JSON file (as printed by `games list --json`)
    Import { database: String, file: PathBuf },

    /// Delete games by name
    Delete {
        database: String,
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Move games to another database
    Move {
        /// Source database
        database: String,

        /// Names of the games to move (all games when omitted)
        names: Vec<String>,

        /// Destination database
        #[arg(long)]
        to: String,

        /// What to do when a game already exists in the destination
        #[arg(long, value_enum, default_value = "ask")]
        on_conflict: OnConflict,
    },
}

/// Conflict policy for `games move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OnConflict {
    /// Prompt for every conflict
    Ask,
    /// Override every conflicting game
    YesAll,
    /// Skip every conflicting game
    NoAll,
    /// Stop at the first conflict
    Cancel,
}

#[derive(Subcommand)]
pub(crate) enum FavoriteAction {
    /// Mark a game as favorite
    Add { database: String, name: String },

    /// Unmark a favorite game
    Remove { database: String, name: String },

    /// List favorite games of every database
    List,
}

#[derive(Subcommand)]
pub(crate) enum ExtraDataAction {
    /// Update every game whose sha1 appears in the file
    Reconcile { file: PathBuf },

    /// Print the version of an extra-data file
    Version { file: PathBuf },
}

#[derive(Subcommand)]
pub(crate) enum MachineAction {
    /// Set the machine of matching games
    Update {
        /// New machine
        #[arg(long)]
        to: String,

        /// Only change games currently on this machine
        #[arg(long)]
        from: Option<String>,

        /// Only change games of this database
        #[arg(long)]
        database: Option<String>,

        /// Back up affected databases first
        #[arg(long)]
        backup: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the resolved store
    Show,

    /// Print the settings file path
    Path,

    /// Save the store location in settings.toml
    SetDatabaseFile { path: PathBuf },
}
