//! Slide playback state machine
//!
//! Single owner of `(index, progress, generation)`. All inputs are plain
//! method calls carrying the caller's notion of "now", so the machine is
//! deterministic and needs no runtime.
//!
//! # Transitions
//!
//! - `advance`: `index < N-1` and not settling → `index + 1`
//! - `retreat`: `index > 0` and not settling → `index - 1`
//! - `tick`: accumulate progress; at 100% advance once and reset to 0
//! - `tap_at(x)`: `x < 1/3` → retreat, else advance
//!
//! Invalid transitions are silent no-ops. Every index change bumps the
//! generation, zeroes progress, and opens a settle window during which
//! manual transitions are ignored. Ticks stamped with an older generation
//! are dropped, so progress earned on one slide never leaks into the next.

use super::duration::DurationPolicy;
use crate::story::Slide;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Taps left of this fraction of the width go back
pub const RETREAT_ZONE: f64 = 1.0 / 3.0;

/// Result of an index change
///
/// Carries what the timer owner needs to re-arm: the new generation and the
/// new slide's duration (None on the terminal slide).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
    pub generation: u64,
    pub duration: Option<Duration>,
}

/// Outcome of a timer tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Progress grew but stayed below 100%
    Progressed { percent: f64 },
    /// Progress hit 100% and the deck moved on
    Advanced(SlideChange),
    /// Tick dropped: terminal slide, empty deck, or stale generation
    Ignored,
}

/// Slide playback state machine
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    slides: Vec<Slide>,
    policy: DurationPolicy,
    settle: Duration,

    index: usize,

    /// Time accumulated on the current slide
    progress: Duration,

    /// Bumped on every index change; identifies the armed timer
    generation: u64,

    /// Manual transitions are ignored until this instant
    settle_until: Option<Instant>,
}

impl PlaybackEngine {
    pub fn new(slides: Vec<Slide>, policy: DurationPolicy, settle: Duration) -> Self {
        debug!("Playback engine created with {} slide(s)", slides.len());
        Self {
            slides,
            policy,
            settle,
            index: 0,
            progress: Duration::ZERO,
            generation: 0,
            settle_until: None,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide(&self) -> Option<&Slide> {
        self.slides.get(self.index)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True on the terminal slide (or an empty deck)
    pub fn is_at_end(&self) -> bool {
        self.index + 1 >= self.slides.len()
    }

    /// Dwell time of the current slide; None on the terminal slide
    pub fn current_duration(&self) -> Option<Duration> {
        self.duration_at(self.index)
    }

    /// Progress on the current slide, 0.0-100.0
    pub fn progress_percent(&self) -> f64 {
        match self.current_duration() {
            Some(total) if !total.is_zero() => {
                (self.progress.as_secs_f64() / total.as_secs_f64() * 100.0).min(100.0)
            }
            _ => 0.0,
        }
    }

    /// Whether manual transitions are currently suppressed
    pub fn is_settling(&self, now: Instant) -> bool {
        self.settle_until.is_some_and(|until| now < until)
    }

    /// Move forward one slide
    pub fn advance(&mut self, now: Instant) -> Option<SlideChange> {
        if self.is_settling(now) {
            trace!("advance ignored: settling");
            return None;
        }
        self.step_forward(now)
    }

    /// Move back one slide
    pub fn retreat(&mut self, now: Instant) -> Option<SlideChange> {
        if self.is_settling(now) {
            trace!("retreat ignored: settling");
            return None;
        }
        if self.index == 0 || self.slides.is_empty() {
            return None;
        }
        Some(self.move_to(self.index - 1, now))
    }

    /// Manual tap at a horizontal position (0.0 = left edge, 1.0 = right)
    pub fn tap_at(&mut self, x_fraction: f64, now: Instant) -> Option<SlideChange> {
        if x_fraction < RETREAT_ZONE {
            self.retreat(now)
        } else {
            self.advance(now)
        }
    }

    /// Accumulate autoplay progress for the current slide
    ///
    /// Timer-driven advances are not subject to the settle window, since
    /// the timer is re-armed on every change and cannot double-fire.
    pub fn tick(&mut self, now: Instant, elapsed: Duration) -> TickOutcome {
        let Some(total) = self.current_duration() else {
            return TickOutcome::Ignored;
        };

        self.progress = self.progress.saturating_add(elapsed);
        if self.progress >= total {
            return match self.step_forward(now) {
                Some(change) => TickOutcome::Advanced(change),
                None => TickOutcome::Ignored,
            };
        }
        TickOutcome::Progressed {
            percent: self.progress_percent(),
        }
    }

    /// Tick on behalf of the timer armed at `generation`
    ///
    /// A tick from a timer armed for an earlier slide is dropped.
    pub fn tick_generation(
        &mut self,
        generation: u64,
        now: Instant,
        elapsed: Duration,
    ) -> TickOutcome {
        if generation != self.generation {
            debug!(
                "Dropping stale tick (generation {} != {})",
                generation, self.generation
            );
            return TickOutcome::Ignored;
        }
        self.tick(now, elapsed)
    }

    fn step_forward(&mut self, now: Instant) -> Option<SlideChange> {
        if self.is_at_end() {
            return None;
        }
        Some(self.move_to(self.index + 1, now))
    }

    /// The only place the index changes: cancel, reset, re-arm
    fn move_to(&mut self, to: usize, now: Instant) -> SlideChange {
        let from = self.index;
        self.index = to;
        self.progress = Duration::ZERO;
        self.generation += 1;
        self.settle_until = now.checked_add(self.settle);

        let change = SlideChange {
            from,
            to,
            generation: self.generation,
            duration: self.current_duration(),
        };
        debug!(
            "Slide {} -> {} (generation {}, duration {:?})",
            from, to, change.generation, change.duration
        );
        change
    }

    fn duration_at(&self, index: usize) -> Option<Duration> {
        let slide = self.slides.get(index)?;
        let is_terminal = index + 1 == self.slides.len();
        self.policy.duration_for(slide, is_terminal)
    }
}
