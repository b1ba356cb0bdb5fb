//! Error types for the query collector

use std::fmt;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Debug)]
pub enum CollectorError {
    /// IO operation failed
    Io(std::io::Error),

    /// HTTP client could not be built
    Http(reqwest::Error),

    /// Configuration error
    Config(String),

    /// Log file could not be opened
    UnreadableFile {
        path: String,
        source: std::io::Error,
    },

    /// Chunk size of zero
    InvalidBatchSize,
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorError::Io(err) => write!(f, "IO error: {}", err),
            CollectorError::Http(err) => write!(f, "HTTP error: {}", err),
            CollectorError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CollectorError::UnreadableFile { path, source } => {
                write!(f, "Unable to read log file {}: {}", path, source)
            }
            CollectorError::InvalidBatchSize => write!(f, "Batch size must be greater than 0"),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectorError::Io(err) => Some(err),
            CollectorError::Http(err) => Some(err),
            CollectorError::UnreadableFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        CollectorError::Io(err)
    }
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        CollectorError::Http(err)
    }
}
