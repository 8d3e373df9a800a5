use std::fmt;

use media_index::IndexError;

/// Startup and configuration errors for the media server.
#[derive(Debug)]
pub enum ServerError {
    /// Invalid or incomplete configuration.
    Config(String),
    /// The media index could not be built or saved.
    Index(IndexError),
    /// Socket or other I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(msg) => write!(f, "configuration error: {msg}"),
            ServerError::Index(err) => write!(f, "media index error: {err}"),
            ServerError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Config(_) => None,
            ServerError::Index(err) => Some(err),
            ServerError::Io(err) => Some(err),
        }
    }
}

impl From<IndexError> for ServerError {
    fn from(err: IndexError) -> Self {
        ServerError::Index(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(err)
    }
}

/// Result type alias using [`ServerError`].
pub type ServerResult<T> = Result<T, ServerError>;
