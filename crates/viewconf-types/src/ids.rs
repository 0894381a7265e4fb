use serde::{Deserialize, Serialize};
use std::fmt;

// Row identifiers are plain SQLite rowids wrapped per table so that a field id
// can never be passed where a button id is expected.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

record_id!(
    /// Business-object model registered in the catalog
    ModelId
);
record_id!(
    /// Field belonging to a model
    FieldId
);
record_id!(
    /// Button belonging to a model
    ButtonId
);
record_id!(
    /// Stored view definition
    ViewId
);
record_id!(
    /// Acting user
    UserId
);
record_id!(
    /// Customization record
    CustomizationId
);
record_id!(
    /// Logical line id, shared by field and button lines
    LineId
);
record_id!(
    /// Snapshot entry
    SnapshotId
);
