use std::fmt;

/// Result type for viewconf-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A stored or user-supplied discriminator string was not recognized
    Parse { kind: &'static str, value: String },
}

impl Error {
    pub(crate) fn parse(kind: &'static str, value: &str) -> Self {
        Error::Parse {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { kind, value } => write!(f, "Unknown {}: '{}'", kind, value),
        }
    }
}

impl std::error::Error for Error {}
