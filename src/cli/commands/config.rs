//! Config command - show or initialize settings

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::cli::Context;
use crate::config::Settings;
use crate::error::CacheResult;
use crate::ui;

/// Execute the config command
pub fn execute(args: ConfigArgs, ctx: &Context) -> CacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_settings(&ctx.settings)?,
        Some(ConfigAction::Path) => println!("{}", ctx.manager.path().display()),
        Some(ConfigAction::Init { force }) => init_settings(ctx, force)?,
    }
    Ok(())
}

fn show_settings(settings: &Settings) -> CacheResult<()> {
    println!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}

fn init_settings(ctx: &Context, force: bool) -> CacheResult<()> {
    let path = ctx.manager.path();

    if ctx.manager.exists() && !force {
        ui::step_warn_hint(
            &format!("Settings already exist at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    ctx.manager.save(&Settings::default())?;
    ui::step_ok_detail("Settings initialized", &path.display().to_string());
    Ok(())
}
