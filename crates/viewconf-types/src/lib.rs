pub mod catalog;
pub mod customization;
pub mod error;
mod ids;
pub mod line;

pub use catalog::*;
pub use customization::*;
pub use error::{Error, Result};
pub use ids::*;
pub use line::*;
