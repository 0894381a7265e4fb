use std::fmt;

/// Result type for viewconf-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Database/index layer error
    Index(viewconf_index::Error),

    /// Arch parsing or rendering error
    Engine(viewconf_engine::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Catalog file could not be read
    Catalog(String),

    /// Unknown model, view or customization
    NotFound(String),

    /// Invalid operation or state
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Index(err) => write!(f, "Index error: {}", err),
            Error::Engine(err) => write!(f, "View error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Catalog(msg) => write!(f, "Catalog error: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Index(err) => Some(err),
            Error::Engine(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::Catalog(_) | Error::NotFound(_) | Error::InvalidOperation(_) => {
                None
            }
        }
    }
}

impl Error {
    /// True when a uniqueness guarantee of the store rejected the write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Index(err) if err.is_constraint_violation())
    }
}

impl From<viewconf_index::Error> for Error {
    fn from(err: viewconf_index::Error) -> Self {
        match err {
            viewconf_index::Error::NotFound(msg) => Error::NotFound(msg),
            other => Error::Index(other),
        }
    }
}

impl From<viewconf_engine::Error> for Error {
    fn from(err: viewconf_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Catalog(err.to_string())
    }
}
