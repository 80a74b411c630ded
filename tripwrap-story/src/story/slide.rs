//! Slide types
//!
//! Slides have no identity beyond their position in the compiled deck.
//! They are projections of the destination list and are rebuilt whenever
//! that list changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tripwrap_common::events::SlideKind;
use tripwrap_common::Destination;

/// Calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Q1 through Q4 in calendar order
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Quarter containing a 1-based month; out-of-range months map to Q4
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    /// Zero-based position, for indexing bucket arrays
    pub fn index(self) -> usize {
        match self {
            Quarter::Q1 => 0,
            Quarter::Q2 => 1,
            Quarter::Q3 => 2,
            Quarter::Q4 => 3,
        }
    }

    /// Human label, e.g. "Jan - Mar"
    pub fn months_label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Jan - Mar",
            Quarter::Q2 => "Apr - Jun",
            Quarter::Q3 => "Jul - Sep",
            Quarter::Q4 => "Oct - Dec",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quarter::Q1 => write!(f, "Q1"),
            Quarter::Q2 => write!(f, "Q2"),
            Quarter::Q3 => write!(f, "Q3"),
            Quarter::Q4 => write!(f, "Q4"),
        }
    }
}

/// Year-in-review numbers shown on the totals slide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTotals {
    pub destinations: usize,
    pub cities: usize,
    /// Distinct countries, compared case-insensitively
    pub countries: usize,
    pub photos: usize,
    /// Label of the destination with the most photos (earliest on ties)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_destination: Option<String>,
}

/// Closing slides, always appended after the quarters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "summary", rename_all = "kebab-case")]
pub enum SummarySlide {
    Totals(StoryTotals),
    /// Terminal slide; never auto-advances
    Outro,
}

/// One renderable slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Slide {
    Intro,
    QuarterIntro {
        quarter: Quarter,
        destinations: Vec<Destination>,
    },
    Destination {
        destination: Destination,
        quarter: Quarter,
    },
    Summary(SummarySlide),
}

impl Slide {
    pub fn kind(&self) -> SlideKind {
        match self {
            Slide::Intro => SlideKind::Intro,
            Slide::QuarterIntro { .. } => SlideKind::QuarterIntro,
            Slide::Destination { .. } => SlideKind::Destination,
            Slide::Summary(_) => SlideKind::Summary,
        }
    }

    /// Short one-line description for logs and the CLI
    pub fn describe(&self) -> String {
        match self {
            Slide::Intro => "intro".to_string(),
            Slide::QuarterIntro {
                quarter,
                destinations,
            } => format!(
                "{} ({}): {} destination(s)",
                quarter,
                quarter.months_label(),
                destinations.len()
            ),
            Slide::Destination {
                destination,
                quarter,
            } => format!(
                "#{} {} [{}] - {} photo(s)",
                destination.visit_order,
                destination.label(),
                quarter,
                destination.photo_count()
            ),
            Slide::Summary(SummarySlide::Totals(totals)) => format!(
                "totals: {} destination(s), {} countr{}, {} photo(s)",
                totals.destinations,
                totals.countries,
                if totals.countries == 1 { "y" } else { "ies" },
                totals.photos
            ),
            Slide::Summary(SummarySlide::Outro) => "outro".to_string(),
        }
    }
}
