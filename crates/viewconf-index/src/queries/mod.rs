pub mod catalog;
pub mod customization;
pub mod line;
pub mod snapshot;

use rusqlite::types::Type;

/// Wraps a decoding failure of a stored discriminator column.
pub(crate) fn conversion_error(column: usize, err: viewconf_types::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
