//! Event types for the story event stream
//!
//! Emitted by the autoplay player so a presentation layer can follow along
//! without polling.

use serde::{Deserialize, Serialize};

/// Coarse slide category carried in events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    Intro,
    QuarterIntro,
    Destination,
    Summary,
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlideKind::Intro => write!(f, "intro"),
            SlideKind::QuarterIntro => write!(f, "quarter-intro"),
            SlideKind::Destination => write!(f, "destination"),
            SlideKind::Summary => write!(f, "summary"),
        }
    }
}

/// What moved the story to a new slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionCause {
    /// Autoplay timer reached 100%
    Timer,
    /// Manual tap or next/prev command
    Manual,
}

/// Story event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoryEvent {
    /// Playback moved to another slide
    SlideChanged {
        index: usize,
        total: usize,
        kind: SlideKind,
        cause: TransitionCause,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Progress update for the current slide (0.0-100.0)
    SlideProgress {
        index: usize,
        percent: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Terminal slide reached; autoplay is off from here on
    StoryFinished {
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Player task exited
    PlayerStopped {
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl StoryEvent {
    /// Event type name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            StoryEvent::SlideChanged { .. } => "SlideChanged",
            StoryEvent::SlideProgress { .. } => "SlideProgress",
            StoryEvent::StoryFinished { .. } => "StoryFinished",
            StoryEvent::PlayerStopped { .. } => "PlayerStopped",
        }
    }
}
