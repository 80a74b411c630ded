//! Destination aggregation
//!
//! Folds the tagged image list into distinct destinations ordered by when
//! they were first visited.
//!
//! # Algorithm
//!
//! 1. Drop images without a resolved location.
//! 2. Walk the rest in input order, grouping by [`DestinationKey`]. The
//!    first image of a group decides its kind, name and country; later
//!    images only contribute their preview and timestamp.
//! 3. Stable-sort groups by earliest timestamp. Groups without any
//!    timestamp go last. Ties keep first-appearance order.
//! 4. Number the result 1..=n as `visit_order`.

use std::collections::HashMap;
use tracing::debug;
use tripwrap_common::{
    Destination, DestinationId, DestinationKey, PlaceKind, PreviewRef, TaggedImage,
};

/// Running state for one destination while images are folded in
#[derive(Debug)]
struct Accumulator {
    kind: PlaceKind,
    name: String,
    country: String,
    images: Vec<PreviewRef>,
    earliest: Option<i64>,

    /// Position of the group's first image among resolved images
    first_seen: u32,
}

impl Accumulator {
    fn absorb(&mut self, image: &TaggedImage) {
        self.images.push(image.preview.clone());
        if let Some(ts) = image.capture_timestamp {
            self.earliest = Some(self.earliest.map_or(ts, |cur| cur.min(ts)));
        }
    }
}

/// Build the ordered destination list from tagged images
///
/// Pure and total: an empty or fully unresolved input yields an empty list,
/// and the same input always yields the same output.
pub fn aggregate(images: &[TaggedImage]) -> Vec<Destination> {
    let mut arena: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<DestinationKey, usize> = HashMap::new();

    for image in images {
        let Some(location) = image.resolved_location.as_ref() else {
            continue;
        };

        let slot = *index.entry(location.key()).or_insert_with(|| {
            arena.push(Accumulator {
                kind: location.kind(),
                name: location.name().to_string(),
                country: location.country_name().to_string(),
                images: Vec::new(),
                earliest: None,
                first_seen: arena.len() as u32,
            });
            arena.len() - 1
        });

        arena[slot].absorb(image);
    }

    // Stable sort: equal keys keep arena (first-appearance) order
    arena.sort_by_key(|acc| (acc.earliest.is_none(), acc.earliest));

    let destinations: Vec<Destination> = arena
        .into_iter()
        .enumerate()
        .map(|(rank, acc)| Destination {
            id: DestinationId::new(acc.first_seen),
            kind: acc.kind,
            name: acc.name,
            country: acc.country,
            images: acc.images,
            visit_order: rank as u32 + 1,
            earliest_timestamp: acc.earliest,
        })
        .collect();

    debug!(
        "Aggregated {} image(s) into {} destination(s)",
        images.len(),
        destinations.len()
    );
    destinations
}
