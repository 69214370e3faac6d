//! Entry commands - put, get and rm

use crate::cache::DEFAULT_NAMESPACE;
use crate::cli::args::{GetArgs, PutArgs, RmArgs};
use crate::cli::Context;
use crate::error::{CacheError, CacheResult};
use crate::fs::OpenMode;
use crate::ui;
use std::fs;
use std::io::{self, Read, Write};
use tracing::debug;

/// Execute the put command
pub fn put(args: PutArgs, ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let namespace = ctx.namespace(args.namespace.as_deref());

    let value = match &args.input {
        Some(path) => fs::read(path)
            .map_err(|e| CacheError::io(format!("reading input {}", path.display()), e))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| CacheError::io("reading stdin", e))?;
            buf
        }
    };
    debug!("Read {} bytes of input", value.len());

    let target = match &args.stream {
        Some(stream) => {
            let mode = if args.append {
                OpenMode::APPEND_BINARY
            } else {
                OpenMode::WRITE_BINARY
            };
            let mut fh = cache.open_stream(&args.key, namespace, stream, mode, true)?;
            fh.write_all(&value)?;
            fh.flush()?;
            format!("{}/{}/{}", display_ns(namespace), args.key, stream)
        }
        None => {
            cache.set(&args.key, &value, namespace)?;
            format!("{}/{}", display_ns(namespace), args.key)
        }
    };

    ui::step_ok_detail(&format!("Stored {} bytes", value.len()), &target);
    Ok(())
}

/// Execute the get command
pub fn get(args: GetArgs, ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let namespace = ctx.namespace(args.namespace.as_deref());

    if args.metadata {
        let meta = cache.metadata(&args.key, namespace)?;
        println!("{}", serde_json::to_string_pretty(&meta)?);
        return Ok(());
    }

    let value = match &args.stream {
        Some(stream) => {
            let mut buf = Vec::new();
            cache
                .open_stream(&args.key, namespace, stream, OpenMode::READ_BINARY, false)?
                .read_to_end(&mut buf)?;
            buf
        }
        None => cache.get(&args.key, namespace)?,
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&value)
        .and_then(|()| stdout.flush())
        .map_err(|e| CacheError::io("writing to stdout", e))
}

/// Execute the rm command
pub fn remove(args: RmArgs, ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let namespace = ctx.namespace(args.namespace.as_deref());

    match &args.key {
        Some(key) => {
            cache.remove_key(key, namespace)?;
            ui::step_ok(&format!("Removed key {}/{}", display_ns(namespace), key));
        }
        None => {
            cache.remove_namespace(namespace)?;
            ui::step_ok(&format!("Removed namespace {}", display_ns(namespace)));
        }
    }
    Ok(())
}

fn display_ns(namespace: Option<&str>) -> &str {
    namespace.unwrap_or(DEFAULT_NAMESPACE)
}
