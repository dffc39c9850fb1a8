//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split by whether they touch the filter store: local commands
//! run synchronously without opening it, store commands are async.

use std::path::PathBuf;

use mailfilter_core::{ActionSet, ConditionField, MergePolicy, SizeCondition, SizeOperator};

use crate::cli::{AddArgs, Cli, Commands, ConfigCommands, SettingsCommands, Shell, SizeOp};
use crate::commands::{self, filters, settings, transfer, CommandContext, CommandError, Result};

/// Trait for commands that run without the filter store.
pub trait LocalCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that read or write the filter store.
#[allow(async_fn_in_trait)]
pub trait StoreCommand {
    /// Execute the command against the store named in `ctx`.
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Commands that don't need the store.
pub enum LocalDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Query(&'a str),
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Try to create a local dispatch from the CLI command.
    /// Returns None if the command needs the store.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Query { input }) => Some(Self::Query(input)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Query(input) => {
                let opts = commands::query::QueryOptions {
                    input: input.to_string(),
                };
                commands::query::execute(ctx, &opts)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("mf - mail filter editor");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that work on the filter store.
pub enum StoreDispatch<'a> {
    List,
    Show(&'a str),
    Add(&'a AddArgs),
    Duplicate { id: &'a str, actions_only: bool },
    Remove { id: &'a str, force: bool },
    Move { id: &'a str, position: usize },
    Export {
        id: &'a Option<String>,
        output: &'a Option<PathBuf>,
        stdout: bool,
    },
    Import {
        path: &'a PathBuf,
        replace: bool,
        force: bool,
    },
    Settings(&'a Option<SettingsCommands>),
}

impl<'a> StoreDispatch<'a> {
    /// Create a store dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match cli.command.as_ref()? {
            Commands::List => Some(Self::List),
            Commands::Show { id } => Some(Self::Show(id)),
            Commands::Add(args) => Some(Self::Add(args)),
            Commands::Duplicate { id, actions_only } => Some(Self::Duplicate {
                id,
                actions_only: *actions_only,
            }),
            Commands::Remove { id, force } => Some(Self::Remove { id, force: *force }),
            Commands::Move { id, position } => Some(Self::Move {
                id,
                position: *position,
            }),
            Commands::Export { id, output, stdout } => Some(Self::Export {
                id,
                output,
                stdout: *stdout,
            }),
            Commands::Import {
                path,
                replace,
                force,
            } => Some(Self::Import {
                path,
                replace: *replace,
                force: *force,
            }),
            Commands::Settings { command } => Some(Self::Settings(command)),
            Commands::Query { .. } | Commands::Config { .. } | Commands::Completions { .. } => None,
        }
    }
}

impl StoreCommand for StoreDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::List => filters::execute_list(ctx).await,
            Self::Show(id) => {
                let opts = filters::FilterShowOptions { id: id.to_string() };
                filters::execute_show(ctx, &opts).await
            }
            Self::Add(args) => filters::execute_add(ctx, &add_options(args)).await,
            Self::Duplicate { id, actions_only } => {
                let opts = filters::FilterDuplicateOptions {
                    id: id.to_string(),
                    actions_only: *actions_only,
                };
                filters::execute_duplicate(ctx, &opts).await
            }
            Self::Remove { id, force } => {
                let opts = filters::FilterRemoveOptions {
                    id: id.to_string(),
                    force: *force,
                };
                filters::execute_remove(ctx, &opts).await
            }
            Self::Move { id, position } => {
                let opts = filters::FilterMoveOptions {
                    id: id.to_string(),
                    position: *position,
                };
                filters::execute_move(ctx, &opts).await
            }
            Self::Export { id, output, stdout } => {
                let opts = transfer::FilterExportOptions {
                    id: (*id).clone(),
                    output: (*output).clone(),
                    stdout: *stdout,
                };
                transfer::execute_export(ctx, &opts).await
            }
            Self::Import {
                path,
                replace,
                force,
            } => {
                let opts = transfer::FilterImportOptions {
                    path: path.to_path_buf(),
                    policy: if *replace {
                        MergePolicy::Replace
                    } else {
                        MergePolicy::Merge
                    },
                    force: *force,
                };
                transfer::execute_import(ctx, &opts).await
            }
            Self::Settings(command) => dispatch_settings(ctx, command).await,
        }
    }
}

/// Dispatch settings subcommands.
async fn dispatch_settings(ctx: &CommandContext, command: &Option<SettingsCommands>) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => settings::execute_show(ctx).await,
        Some(SettingsCommands::DeleteAction { state }) => {
            let opts = settings::DeleteActionOptions {
                enabled: state.is_on(),
            };
            settings::execute_delete_action(ctx, &opts).await
        }
    }
}

/// Maps add arguments onto the domain options.
fn add_options(args: &AddArgs) -> filters::FilterAddOptions {
    let queries = [
        (ConditionField::From, &args.from),
        (ConditionField::To, &args.to),
        (ConditionField::Subject, &args.subject),
        (ConditionField::Includes, &args.has_words),
        (ConditionField::Excludes, &args.excludes),
    ]
    .into_iter()
    .filter_map(|(field, query)| query.clone().map(|q| (field, q)))
    .collect();

    let size = args.size.map(|value| {
        let mut size = SizeCondition {
            value: Some(value),
            ..SizeCondition::default()
        };
        if let Some(op) = args.size_op {
            size.operator = match op {
                SizeOp::Larger => SizeOperator::LargerThan,
                SizeOp::Smaller => SizeOperator::SmallerThan,
            };
        }
        if let Some(unit) = &args.size_unit {
            size.unit = unit.clone();
        }
        size
    });

    let mut actions = ActionSet {
        skip_inbox: args.archive,
        mark_as_read: args.mark_read,
        star: args.star,
        delete: args.delete,
        not_spam: args.not_spam,
        always_important: args.always_important,
        never_important: args.never_important,
        ..ActionSet::default()
    };
    if let Some(label) = &args.label {
        actions.apply_label.enabled = true;
        actions.apply_label.label_name = label.clone();
    }
    if let Some(address) = &args.forward {
        actions.forward.enabled = true;
        actions.forward.forward_address = address.clone();
    }
    if let Some(category) = &args.category {
        actions.apply_category.enabled = true;
        actions.apply_category.category = category.clone();
    }

    filters::FilterAddOptions {
        name: args.name.clone(),
        queries,
        size,
        has_attachment: args.has_attachment,
        actions,
    }
}
