//! Common error types for TripWrap

use thiserror::Error;

/// Common result type for TripWrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across TripWrap crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resolved location violates the city/country field rules
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}
