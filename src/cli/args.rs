//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use url::Url;

use crate::domain::SortBy;

/// Composable playlists, retrying image loaders and swappable gallery sorting
#[derive(Parser, Debug)]
#[command(name = "mediakit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the library's playlist tree
    Play {
        /// Library file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        library: PathBuf,
    },

    /// Show the library's playlist tree
    Tree {
        /// Library file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        library: PathBuf,
    },

    /// List the library's images in sorted order
    Sort {
        /// Library file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        library: PathBuf,
        /// Sort key (default: gallery.sort_by from config)
        #[arg(short, long, value_enum)]
        by: Option<SortKey>,
    },

    /// Load image data from a file:// URL, retrying on failure
    Load {
        /// Image URL
        url: Url,
        /// Attempt bound (default: retry.max_attempts from config)
        #[arg(short = 'n', long)]
        max_attempts: Option<u32>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the global config file location
    Path,
    /// Print a commented config template
    Template,
    /// Write the template to the global config location
    Init,
}

/// Sort key as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Name,
    Size,
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => SortBy::Date,
            SortKey::Name => SortBy::Name,
            SortKey::Size => SortBy::Size,
        }
    }
}
