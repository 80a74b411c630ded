//! Per-slide dwell time

use crate::story::Slide;
use std::time::Duration;
use tripwrap_common::config::PlaybackConfig;

/// How long each slide stays up before autoplay moves on
///
/// Destination slides get longer with more photos so multi-photo places
/// are not rushed. The terminal slide has no duration at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    pub base: Duration,
    pub per_image: Duration,
    pub max_destination: Duration,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for DurationPolicy {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_slide_ms),
            per_image: Duration::from_millis(config.per_image_ms),
            max_destination: Duration::from_millis(config.max_destination_ms),
        }
    }
}

impl DurationPolicy {
    /// Dwell time for a slide, or None if it must never auto-advance
    pub fn duration_for(&self, slide: &Slide, is_terminal: bool) -> Option<Duration> {
        if is_terminal {
            return None;
        }
        match slide {
            Slide::Destination { destination, .. } => {
                let extra_images = destination.photo_count().saturating_sub(1);
                let extra = self
                    .per_image
                    .saturating_mul(u32::try_from(extra_images).unwrap_or(u32::MAX));
                let cap = self.max_destination.max(self.base);
                Some(self.base.saturating_add(extra).min(cap))
            }
            Slide::Intro | Slide::QuarterIntro { .. } | Slide::Summary(_) => Some(self.base),
        }
    }
}
