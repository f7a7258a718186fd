//! Crate-wide error type

use crate::registry::RegistryError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by fragment decoding, loading and registration
#[derive(Debug)]
pub enum Error {
    /// Reading a fragment failed
    Io(std::io::Error),
    /// A record array or JSON fragment could not be decoded
    Json(serde_json::Error),
    /// A fragment line looked like an assignment but could not be parsed
    Fragment {
        /// 1-based line number within the fragment
        line: usize,
        /// What was wrong with it
        reason: String,
    },
    /// The registry rejected or failed to deliver a mapping
    Registry(RegistryError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "Invalid implementor data: {}", e),
            Error::Fragment { line, reason } => {
                write!(f, "Malformed fragment at line {}: {}", line, reason)
            }
            Error::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Fragment { .. } => None,
            Error::Registry(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}
