//! Filters command implementation.
//!
//! Lists and edits the stored filter set. Every mutating command loads the
//! set, applies one change and saves it back through the repository.

use log::warn;
use mailfilter_core::{
    ActionSet, ConditionField, ConditionParser, FilterRecord, FilterSetError, ParseOutcome,
    SizeCondition,
};
use owo_colors::OwoColorize;

use super::{confirm_destructive, resolve_filter_id, CommandContext, CommandError, ConfirmResult, Result};
use crate::output::{
    format_created_filter, format_duplicated_filter, format_filter_details_json,
    format_filter_details_table, format_filters_json, format_filters_table, format_moved_filter,
    format_removed_filter,
};

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn execute_list(ctx: &CommandContext) -> Result<()> {
    let repo = ctx.repository()?;
    let filters = repo.load_filters().await?;

    if ctx.json_output {
        let output = format_filters_json(filters.records())?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_filters_table(filters.records(), ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

// ============================================================================
// Filter Show Command
// ============================================================================

/// Options for the show command.
#[derive(Debug)]
pub struct FilterShowOptions {
    /// Filter id, id prefix or name.
    pub id: String,
}

/// Result of a show lookup.
#[derive(Debug)]
pub struct FilterShowResult {
    /// The filter.
    pub filter: FilterRecord,
    /// 1-based position in the set.
    pub position: usize,
    /// Number of filters in the set.
    pub total: usize,
    /// Whether a delete action would be exported.
    pub delete_enabled: bool,
}

/// Executes the show command.
pub async fn execute_show(ctx: &CommandContext, opts: &FilterShowOptions) -> Result<()> {
    let repo = ctx.repository()?;
    let filters = repo.load_filters().await?;
    let settings = repo.load_settings().await?;

    let id = resolve_filter_id(&filters, &opts.id)?;
    let position = filters
        .position(&id)
        .ok_or_else(|| FilterSetError::NotFound(id.clone()))?;
    let filter = filters.records()[position].clone();

    let result = FilterShowResult {
        filter,
        position: position + 1,
        total: filters.len(),
        delete_enabled: settings.enable_delete_action,
    };

    if ctx.json_output {
        let output = format_filter_details_json(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_filter_details_table(&result, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

// ============================================================================
// Filter Add Command
// ============================================================================

/// Options for the add command.
#[derive(Debug, Default)]
pub struct FilterAddOptions {
    /// Filter name.
    pub name: Option<String>,
    /// Condition queries to parse, by field.
    pub queries: Vec<(ConditionField, String)>,
    /// Size condition, if any.
    pub size: Option<SizeCondition>,
    /// Require an attachment.
    pub has_attachment: bool,
    /// Actions to enable.
    pub actions: ActionSet,
}

/// Result of a successful add.
#[derive(Debug)]
pub struct FilterAddResult {
    /// The new filter's id.
    pub id: String,
    /// The new filter's name.
    pub name: String,
    /// 1-based position in the set.
    pub position: usize,
    /// Queries that could not be split and were kept as one term.
    pub literal_fields: Vec<ConditionField>,
    /// True when a delete action was requested but export of it is disabled.
    pub delete_suppressed: bool,
}

/// Fills a fresh record from the add options.
///
/// Returns the fields whose query fell back to a single literal term.
fn apply_add_options(record: &mut FilterRecord, opts: &FilterAddOptions) -> Vec<ConditionField> {
    let mut literal_fields = Vec::new();

    if let Some(name) = &opts.name {
        record.name = name.trim().to_string();
    }

    for (field, query) in &opts.queries {
        let outcome = ConditionParser::parse(query);
        if let ParseOutcome::Literal(text) = &outcome {
            warn!("{} query {:?} kept as a single term", field.label(), text);
            literal_fields.push(*field);
        }
        *record.conditions.field_mut(*field) = outcome.into_expr();
    }

    if let Some(size) = &opts.size {
        record.conditions.size = size.clone();
    }
    record.conditions.has_attachment = opts.has_attachment;
    record.actions = opts.actions.clone();

    literal_fields
}

/// Executes the add command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub async fn execute_add(ctx: &CommandContext, opts: &FilterAddOptions) -> Result<()> {
    let repo = ctx.repository()?;
    let mut filters = repo.load_filters().await?;
    let settings = repo.load_settings().await?;

    let id = filters.add_new();
    let record = filters
        .get_mut(&id)
        .ok_or_else(|| FilterSetError::NotFound(id.clone()))?;
    let literal_fields = apply_add_options(record, opts);
    let name = record.name.clone();
    let delete_suppressed = record.actions.delete && !settings.enable_delete_action;

    repo.save_filters(&mut filters).await?;

    let result = FilterAddResult {
        position: filters.position(&id).map_or(filters.len(), |p| p + 1),
        id,
        name,
        literal_fields,
        delete_suppressed,
    };

    if ctx.json_output {
        let output = format_created_filter(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        for field in &result.literal_fields {
            print_warning(
                ctx,
                &format!(
                    "{} query could not be split into groups; kept as a single term",
                    field.label()
                ),
            );
        }
        if result.delete_suppressed {
            print_warning(
                ctx,
                "delete action is saved but will not be exported until 'mf settings delete-action on'",
            );
        }
        println!("Added filter #{} ({})", result.position, result.id);
    }

    Ok(())
}

fn print_warning(ctx: &CommandContext, message: &str) {
    if ctx.use_colors {
        eprintln!("{} {}", "Warning:".yellow().bold(), message);
    } else {
        eprintln!("Warning: {}", message);
    }
}

// ============================================================================
// Filter Duplicate Command
// ============================================================================

/// Options for the duplicate command.
#[derive(Debug)]
pub struct FilterDuplicateOptions {
    /// Filter id, id prefix or name to copy.
    pub id: String,
    /// Copy only the actions.
    pub actions_only: bool,
}

/// Result of a successful duplicate.
#[derive(Debug)]
pub struct FilterDuplicateResult {
    /// Id of the copied filter.
    pub source_id: String,
    /// Id of the new copy.
    pub id: String,
    /// Name of the new copy.
    pub name: String,
    /// Whether only actions were copied.
    pub actions_only: bool,
}

/// Executes the duplicate command.
pub async fn execute_duplicate(ctx: &CommandContext, opts: &FilterDuplicateOptions) -> Result<()> {
    let repo = ctx.repository()?;
    let mut filters = repo.load_filters().await?;

    let source_id = resolve_filter_id(&filters, &opts.id)?;
    let id = if opts.actions_only {
        filters.duplicate_actions(&source_id)?
    } else {
        filters.duplicate(&source_id)?
    };
    let name = filters
        .get(&id)
        .map(|f| f.name.clone())
        .unwrap_or_default();

    repo.save_filters(&mut filters).await?;

    let result = FilterDuplicateResult {
        source_id,
        id,
        name,
        actions_only: opts.actions_only,
    };

    if ctx.json_output {
        let output = format_duplicated_filter(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        println!("Created '{}' ({})", result.name, result.id);
    }

    Ok(())
}

// ============================================================================
// Filter Remove Command
// ============================================================================

/// Options for the remove command.
#[derive(Debug)]
pub struct FilterRemoveOptions {
    /// Filter id, id prefix or name.
    pub id: String,
    /// Skip confirmation.
    pub force: bool,
}

/// Result of a successful remove.
#[derive(Debug)]
pub struct FilterRemoveResult {
    /// Id of the removed filter.
    pub id: String,
    /// Name of the removed filter.
    pub name: String,
    /// Filters left in the set.
    pub remaining: usize,
}

/// Executes the remove command.
///
/// # Errors
///
/// Returns [`FilterSetError::LastFilter`] (wrapped) when the filter is the
/// only one left.
pub async fn execute_remove(ctx: &CommandContext, opts: &FilterRemoveOptions) -> Result<()> {
    let repo = ctx.repository()?;
    let mut filters = repo.load_filters().await?;

    let id = resolve_filter_id(&filters, &opts.id)?;
    if filters.len() <= 1 {
        return Err(FilterSetError::LastFilter.into());
    }

    let display_name = filters
        .get(&id)
        .map(|f| f.display_name().to_string())
        .unwrap_or_default();
    let prompt = format!("Remove filter '{}'?", display_name);
    if confirm_destructive(&prompt, opts.force)? == ConfirmResult::Aborted {
        if !ctx.quiet {
            eprintln!("Aborted.");
        }
        return Ok(());
    }

    let removed = filters.remove(&id)?;
    repo.save_filters(&mut filters).await?;

    let result = FilterRemoveResult {
        id: removed.id,
        name: removed.name,
        remaining: filters.len(),
    };

    if ctx.json_output {
        let output = format_removed_filter(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        println!("Removed filter '{}' ({})", display_name, result.id);
    }

    Ok(())
}

// ============================================================================
// Filter Move Command
// ============================================================================

/// Options for the move command.
#[derive(Debug)]
pub struct FilterMoveOptions {
    /// Filter id, id prefix or name.
    pub id: String,
    /// Target position, 1-based.
    pub position: usize,
}

/// Result of a successful move.
#[derive(Debug)]
pub struct FilterMoveResult {
    /// Id of the moved filter.
    pub id: String,
    /// Old 1-based position.
    pub from: usize,
    /// New 1-based position.
    pub to: usize,
}

/// Executes the move command.
pub async fn execute_move(ctx: &CommandContext, opts: &FilterMoveOptions) -> Result<()> {
    if opts.position == 0 {
        return Err(CommandError::Config(
            "Positions start at 1".to_string(),
        ));
    }

    let repo = ctx.repository()?;
    let mut filters = repo.load_filters().await?;

    let id = resolve_filter_id(&filters, &opts.id)?;
    let from = filters
        .position(&id)
        .ok_or_else(|| FilterSetError::NotFound(id.clone()))?;
    let to = opts.position - 1;

    filters.reorder(from, to)?;
    repo.save_filters(&mut filters).await?;

    let result = FilterMoveResult {
        id,
        from: from + 1,
        to: opts.position,
    };

    if ctx.json_output {
        let output = format_moved_filter(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        println!("Moved filter from #{} to #{}", result.from, result.to);
    }

    Ok(())
}
