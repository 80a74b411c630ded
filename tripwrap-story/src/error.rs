//! Error types for tripwrap-story
//!
//! Playback never produces errors: invalid transitions are absorbed as
//! no-ops. Aggregation and compilation are total. What remains is the
//! tagging session, manifest loading, and configuration.

use thiserror::Error;
use tripwrap_common::ImageId;

/// Manual location entry missing a required field
///
/// Recoverable: the caller re-prompts for the same image.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("country is required")]
    MissingCountry,

    #[error("city name is required")]
    MissingCityName,
}

/// Main error type for tripwrap-story
#[derive(Error, Debug)]
pub enum Error {
    /// Manual entry rejected; same image stays current
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Confirm requested for an image without a usable suggestion
    #[error("No location suggestion for image {image_id}")]
    NoSuggestion { image_id: ImageId },

    /// Decision submitted after the last image
    #[error("Tagging session already finished")]
    SessionFinished,

    /// Hand-off requested while images are still undecided
    #[error("Tagging session incomplete: {remaining} image(s) undecided")]
    SessionIncomplete { remaining: usize },

    /// Manifest could not be read or parsed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the common crate (config, model invariants)
    #[error(transparent)]
    Common(#[from] tripwrap_common::Error),
}

/// Convenience Result type using tripwrap-story Error
pub type Result<T> = std::result::Result<T, Error>;
