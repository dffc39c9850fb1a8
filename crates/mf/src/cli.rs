//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the mf CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// mf - Edit, export and import Gmail mail filters
#[derive(Parser, Debug)]
#[command(name = "mf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Filter store file (default: from config, then the user data directory)
    #[arg(long, global = true, env = "MF_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List filters
    #[command(alias = "l")]
    List,

    /// Show filter details
    #[command(alias = "s")]
    Show {
        /// Filter ID (or unique prefix)
        id: String,
    },

    /// Add a new filter
    #[command(alias = "a")]
    Add(AddArgs),

    /// Duplicate a filter
    Duplicate {
        /// Filter ID (or unique prefix)
        id: String,

        /// Copy only the actions, leaving conditions empty
        #[arg(long)]
        actions_only: bool,
    },

    /// Remove a filter
    #[command(alias = "rm")]
    Remove {
        /// Filter ID (or unique prefix)
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Move a filter to a new position (1-based)
    #[command(alias = "mv")]
    Move {
        /// Filter ID (or unique prefix)
        id: String,

        /// Target position, starting at 1
        position: usize,
    },

    /// Export filters as a Gmail filter document
    Export {
        /// Export only this filter
        #[arg(long)]
        id: Option<String>,

        /// Output file (default: generated name in the current directory)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the document to stdout
        #[arg(long)]
        stdout: bool,
    },

    /// Import filters from a Gmail filter document
    Import {
        /// Filter document to read
        path: PathBuf,

        /// Replace all filters instead of merging
        #[arg(long)]
        replace: bool,

        /// Skip confirmation when replacing
        #[arg(short, long)]
        force: bool,
    },

    /// Parse a condition query and print its canonical form
    #[command(alias = "q")]
    Query {
        /// Query string, e.g. "(a AND b) OR c"
        input: String,
    },

    /// Show or change application settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Arguments for the add command
#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Filter name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Sender condition query
    #[arg(long)]
    pub from: Option<String>,

    /// Recipient condition query
    #[arg(long)]
    pub to: Option<String>,

    /// Subject condition query
    #[arg(long)]
    pub subject: Option<String>,

    /// Words the message must contain
    #[arg(long)]
    pub has_words: Option<String>,

    /// Words the message must not contain
    #[arg(long)]
    pub excludes: Option<String>,

    /// Size threshold
    #[arg(long)]
    pub size: Option<u64>,

    /// Size comparison
    #[arg(long, value_enum, requires = "size")]
    pub size_op: Option<SizeOp>,

    /// Size unit, e.g. s_smb or s_skb
    #[arg(long, requires = "size")]
    pub size_unit: Option<String>,

    /// Match only messages with attachments
    #[arg(long)]
    pub has_attachment: bool,

    /// Skip the inbox (archive)
    #[arg(long)]
    pub archive: bool,

    /// Mark as read
    #[arg(long)]
    pub mark_read: bool,

    /// Star the message
    #[arg(long)]
    pub star: bool,

    /// Apply a label
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Forward to an address
    #[arg(long, value_name = "ADDRESS")]
    pub forward: Option<String>,

    /// Delete the message (exported only when enabled in settings)
    #[arg(long)]
    pub delete: bool,

    /// Never send to spam
    #[arg(long)]
    pub not_spam: bool,

    /// Always mark as important
    #[arg(long, conflicts_with = "never_important")]
    pub always_important: bool,

    /// Never mark as important
    #[arg(long)]
    pub never_important: bool,

    /// Apply a category, e.g. ^smartlabel_personal
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,
}

/// Size comparison for the add command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeOp {
    Larger,
    Smaller,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Enable or disable exporting the delete action
    DeleteAction {
        /// New state
        state: Toggle,
    },
}

/// On/off switch
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
