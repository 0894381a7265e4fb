// SQLite store for customizations
// The framework catalog (models, fields, buttons, views) lives in the same file

mod db;
mod error;
mod line_store;
mod queries;
mod records;
mod schema;

// Public API
pub use db::Database;
pub use error::{Error, Result};
pub use line_store::{ButtonLineStore, FieldLineStore, LineRepository, LineStore};
pub use records::{
    CustomizationChanges, CustomizationFilter, NewButton, NewField, NewView, UserMatch, ViewMatch,
};
pub use schema::SCHEMA_VERSION;
