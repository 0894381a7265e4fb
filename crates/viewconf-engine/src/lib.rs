// Engine module - pure view customization logic
// Sits between stored customizations (index) and view resolution (runtime);
// nothing here touches the database.

mod arch;
mod diff;
mod error;
mod fields;
mod render;

pub use arch::{Arch, ArchElement, normalize_arch, parse_arch};
pub use diff::{DiffInput, Difference, compute_difference};
pub use error::{Error, Result};
pub use fields::{FieldInfo, collect_fields};
pub use render::{ColumnPreferences, generate_arch, synthesize_arch};
