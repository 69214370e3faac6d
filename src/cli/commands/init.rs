//! Init command - create or validate the cache root

use crate::cache::CacheBackend;
use crate::cli::Context;
use crate::error::CacheResult;
use crate::ui;

/// Execute the init command
pub fn execute(ctx: &Context) -> CacheResult<()> {
    let cache = ctx.open_cache()?;
    let backend = cache.backend();

    ui::step_ok_detail("Cache ready", &ctx.root().display().to_string());
    ui::key_value("Format version", &backend.config().version.to_string());
    ui::key_value("Connected", &backend.is_connected().to_string());
    Ok(())
}
