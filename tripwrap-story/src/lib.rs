//! # TripWrap Story Library (tripwrap-story)
//!
//! Itinerary reconstruction and story sequencing.
//!
//! **Pipeline:** uploaded images → [`tagging::TaggingSession`] →
//! [`itinerary::aggregate`] → [`story::compile`] →
//! [`playback::PlaybackEngine`] driven by [`playback::StoryPlayer`].
//!
//! Each stage consumes the previous stage's output and never mutates it.

pub mod error;
pub mod export;
pub mod itinerary;
pub mod manifest;
pub mod playback;
pub mod story;
pub mod tagging;

pub use error::{Error, Result, ValidationError};
pub use itinerary::aggregate;
pub use playback::{DurationPolicy, PlaybackEngine, StoryPlayer};
pub use story::{compile, Slide};
pub use tagging::TaggingSession;
