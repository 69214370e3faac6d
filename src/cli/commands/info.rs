//! Info and clear commands

use crate::cache::{CacheBackend, NamespaceSummary};
use crate::cli::args::{ClearArgs, ListArgs, OutputFormat};
use crate::cli::Context;
use crate::error::CacheResult;
use crate::ui;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CacheInfo {
    root: String,
    version: u32,
    connected: bool,
    namespaces: Vec<NamespaceSummary>,
}

/// Execute the info command
pub fn info(args: ListArgs, ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let backend = cache.backend();
    let info = CacheInfo {
        root: backend.root().to_string(),
        version: backend.config().version,
        connected: backend.is_connected(),
        namespaces: cache.describe()?,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Plain => {
            println!("root={}", info.root);
            println!("version={}", info.version);
            println!("connected={}", info.connected);
            println!("namespaces={}", info.namespaces.len());
        }
        OutputFormat::Table => {
            ui::section("Cache");
            ui::key_value("Root", &info.root);
            ui::key_value("Format version", &info.version.to_string());
            ui::key_value("Connected", &info.connected.to_string());
            println!();
            ui::section("Namespaces");
            if info.namespaces.is_empty() {
                ui::remark("none");
            }
            for summary in &info.namespaces {
                ui::key_value(&summary.namespace, &format!("{} key(s)", summary.keys));
            }
        }
    }
    Ok(())
}

/// Execute the clear command
pub fn clear(args: ClearArgs, ctx: &Context) -> CacheResult<()> {
    if !args.yes {
        ui::step_warn_hint(
            &format!("This removes every namespace under {}", ctx.root().display()),
            "Re-run with --yes to confirm",
        );
        return Ok(());
    }

    let cache = ctx.open_cache()?;
    let removed = cache.clear()?;
    ui::step_ok(&format!("Removed {} namespace(s)", removed));
    Ok(())
}
