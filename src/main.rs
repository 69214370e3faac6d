//! fscache - Namespaced filesystem cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use fscache::cli::{Cli, Commands, Context};
use fscache::config::ConfigManager;
use fscache::error::CacheResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> CacheResult<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::locate(cli.config);
    let settings = manager.load()?;

    init_logging(cli.verbose, &settings.general.log_format);
    debug!("Settings loaded from {}", manager.path().display());

    let ctx = Context::new(cli.root, manager, settings);
    debug!("Cache root: {}", ctx.root().display());

    match cli.command {
        Commands::Init => fscache::cli::commands::init(&ctx),
        Commands::Namespaces(args) => fscache::cli::commands::namespaces(args, &ctx),
        Commands::Keys(args) => fscache::cli::commands::keys(args, &ctx),
        Commands::Put(args) => fscache::cli::commands::put(args, &ctx),
        Commands::Get(args) => fscache::cli::commands::get(args, &ctx),
        Commands::Rm(args) => fscache::cli::commands::remove(args, &ctx),
        Commands::Info(args) => fscache::cli::commands::info(args, &ctx),
        Commands::Clear(args) => fscache::cli::commands::clear(args, &ctx),
        Commands::Config(args) => fscache::cli::commands::config(args, &ctx),
    }
}

/// Logs go to stderr so `fscache get` output stays clean.
/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("fscache=warn"),
        1 => EnvFilter::new("fscache=info"),
        _ => EnvFilter::new("fscache=debug"),
    };

    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}
