//! Command-line surface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "renovation", about = "Track renovation progress across rooms 1-23")]
pub struct Cli {
    /// SQLite file holding the persisted room collection.
    #[arg(long, global = true, env = "RENOVATION_DB", default_value = "renovation.sqlite3")]
    pub db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "RENOVATION_LOG_DIR")]
    pub log_dir: Option<String>,

    /// trace|debug|info|warn|error (defaults by build mode).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List rooms, optionally filtered by room number or notes text.
    List { query: Option<String> },
    /// Show one room in detail.
    Show { room: String },
    /// Print the progress header.
    Summary,
    /// Set a room status (todo, in_progress, done).
    Status { room: String, status: String },
    /// Toggle one checklist category.
    Check { room: String, category: String },
    /// Replace room notes.
    Notes { room: String, text: String },
    /// Append the sample task line to room notes.
    SampleTask { room: String },
    /// Overwrite room notes with "No work needed".
    NoWork { room: String },
    /// Attach image files to a room.
    AddPhotos {
        room: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove one photo by id.
    RemovePhoto { room: String, photo_id: String },
    /// Write the JSON export into a directory.
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Replace all rooms with an exported JSON file.
    Import { file: PathBuf },
    /// Clear all data.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the core version.
    Version,
}

impl Command {
    /// Whether the command changes room state.
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Self::List { .. } | Self::Show { .. } | Self::Summary | Self::Export { .. } | Self::Version
        )
    }
}
