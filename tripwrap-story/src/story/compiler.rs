//! Story compiler
//!
//! Turns the ordered destination list into the slide deck:
//!
//! ```text
//! Intro
//! for each non-empty quarter Q1..Q4:
//!     QuarterIntro(quarter, bucket)
//!     Destination(d, quarter)   for d in bucket
//! Summary(Totals)
//! Summary(Outro)                <- terminal
//! ```
//!
//! Destinations are bucketed by the calendar month of their earliest
//! timestamp. Undated destinations go to Q4 rather than being dropped.

use super::slide::{Quarter, Slide, StoryTotals, SummarySlide};
use chrono::FixedOffset;
use std::collections::HashSet;
use tracing::debug;
use tripwrap_common::time::{month_of_year, utc_offset};
use tripwrap_common::{Destination, PlaceKind};

/// Number of slides after the quarters
pub const SUMMARY_TAIL_LEN: usize = 2;

/// Quarter a destination belongs to, months read at `offset`
pub fn quarter_of(destination: &Destination, offset: FixedOffset) -> Quarter {
    destination
        .earliest_timestamp
        .and_then(|ts| month_of_year(ts, offset))
        .map(Quarter::from_month)
        .unwrap_or(Quarter::Q4)
}

/// Split destinations into Q1..Q4 buckets, preserving input order within each
pub fn bucket_by_quarter(
    destinations: &[Destination],
    offset: FixedOffset,
) -> [Vec<Destination>; 4] {
    let mut buckets: [Vec<Destination>; 4] = Default::default();
    for destination in destinations {
        buckets[quarter_of(destination, offset).index()].push(destination.clone());
    }
    buckets
}

/// Compile the deck reading months in UTC
pub fn compile(destinations: &[Destination]) -> Vec<Slide> {
    compile_with_offset(destinations, utc_offset())
}

/// Compile the deck reading months at a fixed UTC offset
///
/// Total and deterministic: equal input always yields an equal deck.
pub fn compile_with_offset(destinations: &[Destination], offset: FixedOffset) -> Vec<Slide> {
    let buckets = bucket_by_quarter(destinations, offset);
    let active = buckets.iter().filter(|b| !b.is_empty()).count();

    let mut slides = Vec::with_capacity(1 + active + destinations.len() + SUMMARY_TAIL_LEN);
    slides.push(Slide::Intro);

    for (quarter, bucket) in Quarter::ALL.into_iter().zip(buckets) {
        if bucket.is_empty() {
            continue;
        }
        let members: Vec<Slide> = bucket
            .iter()
            .map(|destination| Slide::Destination {
                destination: destination.clone(),
                quarter,
            })
            .collect();
        slides.push(Slide::QuarterIntro {
            quarter,
            destinations: bucket,
        });
        slides.extend(members);
    }

    slides.push(Slide::Summary(SummarySlide::Totals(totals(destinations))));
    slides.push(Slide::Summary(SummarySlide::Outro));

    debug!(
        "Compiled {} slide(s) from {} destination(s) across {} quarter(s)",
        slides.len(),
        destinations.len(),
        active
    );
    slides
}

/// Year-in-review numbers for the totals slide
pub fn totals(destinations: &[Destination]) -> StoryTotals {
    let countries: HashSet<String> = destinations
        .iter()
        .map(|d| d.country.trim().to_lowercase())
        .collect();

    // max_by_key keeps the last maximum; iterate in reverse so the earliest wins
    let top_destination = destinations
        .iter()
        .rev()
        .max_by_key(|d| d.photo_count())
        .map(Destination::label);

    StoryTotals {
        destinations: destinations.len(),
        cities: destinations
            .iter()
            .filter(|d| d.kind == PlaceKind::City)
            .count(),
        countries: countries.len(),
        photos: destinations.iter().map(Destination::photo_count).sum(),
        top_destination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tripwrap_common::{DestinationId, PreviewRef};

    fn ts(month: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, month, 15, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn dest(order: u32, name: &str, photos: usize, earliest: Option<i64>) -> Destination {
        Destination {
            id: DestinationId::new(order),
            kind: PlaceKind::City,
            name: name.to_string(),
            country: format!("{}land", name),
            images: (0..photos)
                .map(|i| PreviewRef::new(format!("{}-{}", name, i)))
                .collect(),
            visit_order: order,
            earliest_timestamp: earliest,
        }
    }

    #[test]
    fn test_empty_deck_is_intro_plus_summary() {
        let slides = compile(&[]);
        assert_eq!(slides.len(), 1 + SUMMARY_TAIL_LEN);
        assert_eq!(slides[0], Slide::Intro);
        assert_eq!(
            slides[1],
            Slide::Summary(SummarySlide::Totals(StoryTotals::default()))
        );
        assert_eq!(slides[2], Slide::Summary(SummarySlide::Outro));
    }

    #[test]
    fn test_undated_goes_to_q4() {
        let d = dest(1, "Nowhere", 1, None);
        assert_eq!(quarter_of(&d, utc_offset()), Quarter::Q4);

        let slides = compile(&[d]);
        assert!(matches!(
            &slides[1],
            Slide::QuarterIntro { quarter: Quarter::Q4, destinations } if destinations.len() == 1
        ));
    }

    #[test]
    fn test_quarters_emitted_in_calendar_order_skipping_empty() {
        let dests = vec![
            dest(1, "A", 1, Some(ts(2))),
            dest(2, "B", 1, Some(ts(8))),
            dest(3, "C", 1, Some(ts(3))),
        ];
        let slides = compile(&dests);

        let outline: Vec<String> = slides.iter().map(Slide::describe).collect();
        assert_eq!(slides.len(), 1 + 2 + 3 + SUMMARY_TAIL_LEN);
        assert!(
            matches!(
                &slides[1],
                Slide::QuarterIntro {
                    quarter: Quarter::Q1,
                    ..
                }
            ),
            "{:?}",
            outline
        );
        assert!(matches!(
            &slides[2],
            Slide::Destination { destination, .. } if destination.name == "A"
        ));
        assert!(matches!(
            &slides[3],
            Slide::Destination { destination, .. } if destination.name == "C"
        ));
        assert!(matches!(
            &slides[4],
            Slide::QuarterIntro {
                quarter: Quarter::Q3,
                ..
            }
        ));
        assert!(matches!(
            &slides[5],
            Slide::Destination {
                destination,
                quarter: Quarter::Q3,
            } if destination.name == "B"
        ));
    }

    #[test]
    fn test_offset_can_move_destination_across_quarters() {
        // 2024-03-31 23:00 UTC is April at UTC+2
        let t = Utc.with_ymd_and_hms(2024, 3, 31, 23, 0, 0).unwrap().timestamp_millis();
        let d = dest(1, "Edge", 1, Some(t));
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(quarter_of(&d, utc_offset()), Quarter::Q1);
        assert_eq!(quarter_of(&d, plus_two), Quarter::Q2);
    }

    #[test]
    fn test_totals() {
        let mut japan = dest(3, "Japan", 2, None);
        japan.kind = PlaceKind::Country;
        japan.country = "Japan".to_string();
        let mut osaka = dest(2, "Osaka", 4, Some(ts(5)));
        osaka.country = "japan".to_string();
        let dests = vec![dest(1, "Paris", 4, Some(ts(1))), osaka, japan];

        let t = totals(&dests);
        assert_eq!(t.destinations, 3);
        assert_eq!(t.cities, 2);
        assert_eq!(t.countries, 2);
        assert_eq!(t.photos, 10);
        assert_eq!(t.top_destination.as_deref(), Some("Paris, Parisland"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let dests = vec![
            dest(1, "A", 2, Some(ts(11))),
            dest(2, "B", 1, None),
            dest(3, "C", 3, Some(ts(4))),
        ];
        assert_eq!(compile(&dests), compile(&dests));
    }
}
