//! Settings command implementation.
//!
//! Shows and changes the application settings kept in the store next to
//! the filters. The delete policy lives here rather than in the config
//! file, so it travels with the filter data.

use super::{CommandContext, Result};
use crate::output::{format_settings_json, format_settings_table};

/// Executes the settings show command.
pub async fn execute_show(ctx: &CommandContext) -> Result<()> {
    let repo = ctx.repository()?;
    let settings = repo.load_settings().await?;

    if ctx.json_output {
        let output = format_settings_json(&settings)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_settings_table(&settings, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Options for the settings delete-action command.
#[derive(Debug)]
pub struct DeleteActionOptions {
    /// Whether deletes are exported.
    pub enabled: bool,
}

/// Executes the settings delete-action command.
pub async fn execute_delete_action(ctx: &CommandContext, opts: &DeleteActionOptions) -> Result<()> {
    let repo = ctx.repository()?;
    let mut settings = repo.load_settings().await?;

    settings.enable_delete_action = opts.enabled;
    repo.save_settings(&mut settings).await?;

    if ctx.json_output {
        let output = format_settings_json(&settings)?;
        println!("{output}");
    } else if !ctx.quiet {
        let state = if opts.enabled { "enabled" } else { "disabled" };
        println!("Delete action export {}", state);
    }

    Ok(())
}
