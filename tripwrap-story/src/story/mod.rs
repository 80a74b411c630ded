//! Quarter bucketing and slide deck compilation

pub mod compiler;
pub mod slide;

pub use compiler::{bucket_by_quarter, compile, compile_with_offset, quarter_of, totals};
pub use slide::{Quarter, Slide, StoryTotals, SummarySlide};
