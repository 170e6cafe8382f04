//! Error types for succinct bit vector operations.

use thiserror::Error;

/// Error variants for succinct bit vector operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A bit index or rank position was outside the structure's bounds.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// A serialized bit vector could not be decoded.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// A specialized Result type for succinct bit vector operations.
pub type Result<T> = std::result::Result<T, Error>;
