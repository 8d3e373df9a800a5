use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown media entry: {0}")]
    UnknownEntry(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Path escapes media root: {0}")]
    OutsideRoot(PathBuf),
}

pub type Result<T> = std::result::Result<T, IndexError>;
