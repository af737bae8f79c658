/// Arguments of the `trash-purge` binary
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "trash-purge",
    version,
    about = "List/delete/empty the Recycle Bin (Windows) or Trash (Linux/macOS)"
)]
pub struct TrashArgs {
    #[command(subcommand)]
    pub command: TrashCommand,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum TrashCommand {
    /// Show items currently in the trash
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Permanently delete items matching text (dry run without --force)
    Delete {
        /// Substring matched against name, original path and location
        #[arg(long = "match")]
        needle: String,

        /// Actually delete
        #[arg(long)]
        force: bool,
    },

    /// Empty the trash permanently (dry run without --force)
    Empty {
        /// Actually empty
        #[arg(long)]
        force: bool,
    },
}
