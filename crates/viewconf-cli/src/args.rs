use crate::types::{ColumnVisibility, LogLevel, OptionalArg, OutputFormat, ViewTypeArg};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "viewconf")]
#[command(about = "Customize tree views of business-object models", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $VIEWCONF_PATH, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Acting user; overrides `user` in config.toml
    #[arg(long, global = true)]
    pub user: Option<i64>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Log verbosity; $VIEWCONF_LOG takes precedence when set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Models, fields, buttons and stored views
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    /// Per-user tree view customizations
    #[command(name = "custom-view")]
    CustomView {
        #[command(subcommand)]
        command: CustomViewCommand,
    },

    /// Columns and buttons of a customization
    Line {
        #[command(subcommand)]
        command: LineCommand,
    },

    /// Resolve views the way a client would receive them
    View {
        #[command(subcommand)]
        command: ViewCommand,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Upsert models, fields, buttons and views from a JSON file
    Import { file: PathBuf },

    Models,

    Views { model: String },
}

#[derive(Subcommand)]
pub enum CustomViewCommand {
    /// Return the acting user's customization, creating it if needed
    Get {
        model: String,

        /// Base view id; "null" or "0" for none
        #[arg(long, default_value = "null")]
        view: String,
    },

    Create {
        model: String,

        #[arg(long)]
        view: Option<i64>,

        /// Create the default customization shared by users without their own
        #[arg(long)]
        for_all_users: bool,
    },

    List {
        #[arg(long)]
        model: Option<String>,
    },

    /// Lines, pending difference and rendered arch
    Show { id: i64 },

    /// Materialize new default-view resources into lines
    Snapshot {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    Copy {
        id: i64,

        /// Owner of the copy; defaults to the acting user
        #[arg(long)]
        to_user: Option<i64>,
    },

    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum LineCommand {
    Add {
        customization: i64,

        #[arg(long, conflicts_with = "button", required_unless_present = "button")]
        field: Option<String>,

        #[arg(long)]
        button: Option<String>,

        #[command(flatten)]
        options: LineOptionArgs,
    },

    Set {
        #[arg(required = true)]
        ids: Vec<i64>,

        #[command(flatten)]
        options: LineOptionArgs,
    },

    Remove {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LineOptionArgs {
    #[arg(long)]
    pub sequence: Option<i32>,

    #[arg(long)]
    pub expand: Option<i32>,

    #[arg(long)]
    pub optional: Option<OptionalArg>,

    /// Hidden column that stays searchable
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub searchable: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub sum: Option<bool>,
}

#[derive(Subcommand)]
pub enum ViewCommand {
    Get {
        model: String,

        #[arg(long)]
        view_id: Option<i64>,

        #[arg(long = "type")]
        view_type: Option<ViewTypeArg>,

        /// Relation depth of the returned field map
        #[arg(long)]
        level: Option<u32>,

        /// Skip customizations and return the stored view
        #[arg(long)]
        default: bool,
    },

    /// Show, hide or clear the acting user's choice for an optional column
    Optional {
        view_id: i64,
        field: String,
        visibility: ColumnVisibility,
    },
}
