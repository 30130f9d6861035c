//! Error taxonomy for the primitive I/O layer.

use thiserror::Error;

/// Failure reading a primitive or framed value from a byte stream.
#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("EOF, tried to read {0} but no bytes were left to consume")]
    CleanEof(String),
    #[error("incomplete: {0}")]
    Incomplete(String),
    #[error("too large: {0}")]
    TooLarge(String),
    #[error("{0}")]
    Message(String),
}

impl From<std::io::Error> for ReadingError {
    fn from(value: std::io::Error) -> Self {
        Self::Message(value.to_string())
    }
}

/// Failure writing a primitive or framed value to a byte stream.
#[derive(Debug, Error)]
pub enum WritingError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("failed to serialize: {0}")]
    Message(String),
}

impl From<std::io::Error> for WritingError {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}
