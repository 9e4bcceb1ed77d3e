//! Error types for the resource-fetch crate.
//!
//! Only failures that end the run are errors. A download that yields no data
//! is reported through [`FetchResult::Failed`](crate::FetchResult) and the
//! status sink instead.

use std::{fmt, path::PathBuf};

/// Result type for resource-fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or storing resources.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed.
    Http {
        /// The URL that failed.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// A local storage operation failed.
    Storage {
        /// The operation that failed.
        operation: &'static str,
        /// The path the operation targeted.
        path: PathBuf,
        /// The error message.
        message: String,
    },
    /// A clip record does not fit the archive's length fields.
    Archive {
        /// The clip name.
        name: String,
        /// Description of what overflowed.
        detail: String,
    },
    /// Invalid configuration.
    Config {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl Error {
    pub(crate) fn storage(
        operation: &'static str,
        path: impl Into<PathBuf>,
        e: &std::io::Error,
    ) -> Self {
        Error::Storage {
            operation,
            path: path.into(),
            message: e.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::Storage {
                operation,
                path,
                message,
            } => {
                write!(f, "storage {operation} on {} failed: {message}", path.display())
            }
            Error::Archive { name, detail } => {
                write!(f, "cannot archive clip {name}: {detail}")
            }
            Error::Config { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {}
