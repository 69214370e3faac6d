//! Listing commands - namespaces and keys

use crate::cache::{EntryMetadata, NamespaceSummary, DEFAULT_NAMESPACE};
use crate::cli::args::{KeysArgs, ListArgs, OutputFormat};
use crate::cli::{Context, LocalCache};
use crate::error::CacheResult;
use serde::Serialize;

/// Execute the namespaces command
pub fn namespaces(args: ListArgs, ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let summaries = cache.describe()?;

    match args.format {
        OutputFormat::Table => print_namespace_table(&summaries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Plain => {
            for summary in &summaries {
                println!("{}", summary.namespace);
            }
        }
    }
    Ok(())
}

fn print_namespace_table(summaries: &[NamespaceSummary]) {
    if summaries.is_empty() {
        println!("No namespaces found.");
        return;
    }

    println!("{:<40} {:>8}", "NAMESPACE", "KEYS");
    println!("{}", "-".repeat(49));
    for summary in summaries {
        println!("{:<40} {:>8}", summary.namespace, summary.keys);
    }
    println!();
    println!("Total: {} namespace(s)", summaries.len());
}

/// One row of `fscache keys`
#[derive(Debug, Serialize)]
struct KeyRow {
    key: String,
    size: Option<u64>,
    created_at: Option<String>,
}

/// Execute the keys command
pub fn keys(args: KeysArgs, ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let namespace = ctx.namespace(args.namespace.as_deref());

    if !cache.has_namespace(namespace)? {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!(
                "Namespace {} is empty.",
                namespace.unwrap_or(DEFAULT_NAMESPACE)
            ),
        }
        return Ok(());
    }

    let mut keys = cache.keys(namespace)?;
    keys.sort();

    match args.format {
        OutputFormat::Plain => {
            for key in &keys {
                println!("{}", key);
            }
        }
        OutputFormat::Json => {
            let rows = key_rows(&cache, namespace, keys);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => print_key_table(&key_rows(&cache, namespace, keys)),
    }
    Ok(())
}

/// Keys written as raw streams have no metadata; they list without size
fn key_rows(cache: &LocalCache, namespace: Option<&str>, keys: Vec<String>) -> Vec<KeyRow> {
    keys.into_iter()
        .map(|key| {
            let meta: Option<EntryMetadata> = cache.metadata(&key, namespace).ok();
            KeyRow {
                size: meta.as_ref().map(|m| m.size),
                created_at: meta.map(|m| m.created_at.to_rfc3339()),
                key,
            }
        })
        .collect()
}

fn print_key_table(rows: &[KeyRow]) {
    println!("{:<40} {:>10} {:<20}", "KEY", "SIZE", "CREATED");
    println!("{}", "-".repeat(72));
    for row in rows {
        let size = row
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let created = row
            .created_at
            .as_deref()
            .and_then(|c| chrono::DateTime::parse_from_rfc3339(c).ok())
            .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<40} {:>10} {:<20}", row.key, size, created);
    }
    println!();
    println!("Total: {} key(s)", rows.len());
}
