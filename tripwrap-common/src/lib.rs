//! # TripWrap Common Library
//!
//! Shared code for the TripWrap crates including:
//! - Image, location and destination models
//! - Destination identity keys
//! - Story event types (StoryEvent enum)
//! - Configuration loading
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod time;

pub use error::{Error, Result};
pub use model::{
    Destination, DestinationId, DestinationKey, ImageId, PlaceKind, PreviewRef, ResolvedLocation,
    SuggestedLocation, TaggedImage,
};
