//! Slide playback: duration policy, state machine, and autoplay driver

pub mod duration;
pub mod engine;
pub mod player;

pub use duration::DurationPolicy;
pub use engine::{PlaybackEngine, SlideChange, TickOutcome};
pub use player::{PlayerCommand, PlayerOptions, PlayerSnapshot, StoryPlayer};
