//! Error types for paritylight

use thiserror::Error;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("No such command: {0}")]
    UnknownCommand(String),

    #[error("No such buffer: {0}")]
    NoSuchBuffer(String),

    #[error("Buffer has no file name")]
    NoFilename,

    #[error("{0}")]
    Message(String),
}
