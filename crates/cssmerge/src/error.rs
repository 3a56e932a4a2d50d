//! Error types for the compiler.

use std::path::PathBuf;

use crate::parser::ScanError;

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a compile call.
///
/// Integrity violations are not errors in this sense; they are reported as
/// [`IntegrityError`](crate::verify::IntegrityError) values alongside a
/// successful result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fatal stylesheet scan error.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration file.
    #[error("Invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The scan error, if this is one.
    pub fn as_scan(&self) -> Option<&ScanError> {
        match self {
            Self::Scan(err) => Some(err),
            _ => None,
        }
    }
}
