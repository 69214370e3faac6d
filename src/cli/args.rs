//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fscache - Namespaced filesystem cache
///
/// Stores entries as directories of named streams under a cache root,
/// grouped by namespace.
#[derive(Parser, Debug)]
#[command(name = "fscache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Cache root directory
    #[arg(short, long, global = true, env = "FSCACHE_ROOT")]
    pub root: Option<PathBuf>,

    /// Settings file path
    #[arg(short, long, global = true, env = "FSCACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize (or validate) the cache root
    Init,

    /// List namespaces
    Namespaces(ListArgs),

    /// List keys of a namespace
    Keys(KeysArgs),

    /// Store data under a key
    Put(PutArgs),

    /// Write the data of a key to stdout
    Get(GetArgs),

    /// Remove a key, or a whole namespace when no key is given
    Rm(RmArgs),

    /// Show cache location, format version and contents
    Info(ListArgs),

    /// Remove every namespace
    Clear(ClearArgs),

    /// Show or initialize settings
    Config(ConfigArgs),
}

/// Arguments for listing commands
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the keys command
#[derive(Parser, Debug)]
pub struct KeysArgs {
    /// Namespace (defaults to settings, then __default__)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the put command
#[derive(Parser, Debug)]
pub struct PutArgs {
    /// Key to write
    pub key: String,

    /// Namespace (defaults to settings, then __default__)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Write a raw named stream instead of the data/metadata pair
    #[arg(short, long)]
    pub stream: Option<String>,

    /// Read input from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Append to the stream instead of replacing it
    #[arg(long, requires = "stream")]
    pub append: bool,
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Key to read
    pub key: String,

    /// Namespace (defaults to settings, then __default__)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Read a raw named stream instead of the data stream
    #[arg(short, long, conflicts_with = "metadata")]
    pub stream: Option<String>,

    /// Print the entry metadata as JSON
    #[arg(long)]
    pub metadata: bool,
}

/// Arguments for the rm command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Key to remove (omit to remove the namespace)
    pub key: Option<String>,

    /// Namespace (defaults to settings, then __default__)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Confirm removal of all namespaces
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current settings
    Show,

    /// Show settings file path
    Path,

    /// Write default settings
    Init {
        /// Overwrite existing settings
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
