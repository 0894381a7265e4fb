use clap::ValueEnum;
use std::fmt;
use viewconf_types::{OptionalMode, ViewType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ViewTypeArg {
    Tree,
    Form,
    Graph,
    Calendar,
}

impl From<ViewTypeArg> for ViewType {
    fn from(arg: ViewTypeArg) -> Self {
        match arg {
            ViewTypeArg::Tree => ViewType::Tree,
            ViewTypeArg::Form => ViewType::Form,
            ViewTypeArg::Graph => ViewType::Graph,
            ViewTypeArg::Calendar => ViewType::Calendar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OptionalArg {
    /// Always present
    Unset,
    /// Optional, shown by default
    Show,
    /// Optional, hidden by default
    Hide,
}

impl From<OptionalArg> for OptionalMode {
    fn from(arg: OptionalArg) -> Self {
        match arg {
            OptionalArg::Unset => OptionalMode::Unset,
            OptionalArg::Show => OptionalMode::Show,
            OptionalArg::Hide => OptionalMode::Hide,
        }
    }
}

/// A user's own choice for an optional column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ColumnVisibility {
    Show,
    Hide,
    Clear,
}

impl ColumnVisibility {
    /// `Some(true)` means hidden; `None` drops the stored preference.
    pub fn hidden(self) -> Option<bool> {
        match self {
            ColumnVisibility::Show => Some(false),
            ColumnVisibility::Hide => Some(true),
            ColumnVisibility::Clear => None,
        }
    }
}
