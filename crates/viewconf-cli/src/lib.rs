// viewconf CLI
//
// Thin layer over viewconf-runtime: every command opens the workspace in
// --data-dir, performs one configurator or resolver call and renders the
// result as plain text or JSON.

mod args;
mod commands;
pub mod context;
mod handlers;
pub mod presentation;
pub mod types;

pub use args::{
    CatalogCommand, Cli, Commands, CustomViewCommand, LineCommand, LineOptionArgs, ViewCommand,
};
pub use commands::run;
