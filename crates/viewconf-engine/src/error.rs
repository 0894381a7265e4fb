use std::fmt;

/// Result type for viewconf-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading or writing view archs
#[derive(Debug)]
pub enum Error {
    /// Malformed arch document
    Xml(quick_xml::Error),

    /// Writing the generated document failed
    Io(std::io::Error),

    /// Root element is not the one the operation expects
    UnexpectedRoot(String),

    /// Document contains no element at all
    EmptyDocument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Xml(err) => write!(f, "Invalid arch: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::UnexpectedRoot(tag) => write!(f, "Unexpected root element <{}>", tag),
            Error::EmptyDocument => write!(f, "Arch has no root element"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Xml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::UnexpectedRoot(_) | Error::EmptyDocument => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(quick_xml::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
