//! Image, location and destination models
//!
//! These types flow forward through the pipeline: upload records become
//! [`TaggedImage`]s, the tagging session fills in a [`ResolvedLocation`] for
//! some of them, and the aggregator folds resolved images into
//! [`Destination`]s keyed by [`DestinationKey`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique image identifier, assigned at upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to displayable pixel data
///
/// Owned by the upload side. The core only carries it around and never
/// decodes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Place granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    City,
    Country,
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceKind::City => write!(f, "city"),
            PlaceKind::Country => write!(f, "country"),
        }
    }
}

/// Advisory place hint from the geocoder
///
/// Never validated. Coordinates are carried for completeness only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl SuggestedLocation {
    pub fn new(city: Option<&str>, country: Option<&str>) -> Self {
        Self {
            lat: None,
            lng: None,
            city: city.map(str::to_string),
            country: country.map(str::to_string),
        }
    }
}

/// User-confirmed place for an image
///
/// Country-kind locations always have `name == country`; city-kind
/// locations always have a non-empty name and country. Both constructors
/// and deserialization enforce this, so a value of this type is always
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResolvedLocation")]
pub struct ResolvedLocation {
    kind: PlaceKind,
    name: String,
    country: String,
}

#[derive(Deserialize)]
struct RawResolvedLocation {
    kind: PlaceKind,
    #[serde(default)]
    name: String,
    country: String,
}

impl TryFrom<RawResolvedLocation> for ResolvedLocation {
    type Error = Error;

    fn try_from(raw: RawResolvedLocation) -> Result<Self> {
        match raw.kind {
            PlaceKind::City => Self::city(&raw.name, &raw.country),
            PlaceKind::Country => Self::country(&raw.country),
        }
    }
}

impl ResolvedLocation {
    /// City within a country; both parts must be non-blank
    pub fn city(name: &str, country: &str) -> Result<Self> {
        let name = name.trim();
        let country = country.trim();
        if name.is_empty() {
            return Err(Error::InvalidLocation("city name is empty".to_string()));
        }
        if country.is_empty() {
            return Err(Error::InvalidLocation(format!(
                "city '{}' has no country",
                name
            )));
        }
        Ok(Self {
            kind: PlaceKind::City,
            name: name.to_string(),
            country: country.to_string(),
        })
    }

    /// Whole-country location; the name mirrors the country
    pub fn country(country: &str) -> Result<Self> {
        let country = country.trim();
        if country.is_empty() {
            return Err(Error::InvalidLocation("country is empty".to_string()));
        }
        Ok(Self {
            kind: PlaceKind::Country,
            name: country.to_string(),
            country: country.to_string(),
        })
    }

    pub fn kind(&self) -> PlaceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country_name(&self) -> &str {
        &self.country
    }

    /// Identity key used to merge images into one destination
    pub fn key(&self) -> DestinationKey {
        DestinationKey::from(self)
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PlaceKind::City => write!(f, "{}, {}", self.name, self.country),
            PlaceKind::Country => f.write_str(&self.country),
        }
    }
}

/// Case- and whitespace-insensitive destination identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DestinationKey {
    City { name: String, country: String },
    Country { country: String },
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl From<&ResolvedLocation> for DestinationKey {
    fn from(location: &ResolvedLocation) -> Self {
        match location.kind {
            PlaceKind::City => DestinationKey::City {
                name: normalize(&location.name),
                country: normalize(&location.country),
            },
            PlaceKind::Country => DestinationKey::Country {
                country: normalize(&location.country),
            },
        }
    }
}

/// One uploaded photo plus its location resolution state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedImage {
    id: ImageId,

    /// Handle to the displayable preview
    pub preview: PreviewRef,

    /// Capture time in epoch milliseconds, if any was recoverable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_location: Option<SuggestedLocation>,

    /// Absent means the image is left out of destination aggregation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_location: Option<ResolvedLocation>,
}

impl TaggedImage {
    /// New unresolved image with a freshly assigned id
    pub fn new(preview: PreviewRef) -> Self {
        Self::with_id(ImageId::new(), preview)
    }

    pub fn with_id(id: ImageId, preview: PreviewRef) -> Self {
        Self {
            id,
            preview,
            capture_timestamp: None,
            suggested_location: None,
            resolved_location: None,
        }
    }

    pub fn captured_at(mut self, timestamp_ms: i64) -> Self {
        self.capture_timestamp = Some(timestamp_ms);
        self
    }

    pub fn suggested(mut self, suggestion: SuggestedLocation) -> Self {
        self.suggested_location = Some(suggestion);
        self
    }

    pub fn resolved(mut self, location: ResolvedLocation) -> Self {
        self.resolved_location = Some(location);
        self
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_location.is_some()
    }
}

/// Aggregation-assigned destination identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationId(u32);

impl DestinationId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dest-{}", self.0)
    }
}

/// A deduplicated place built from one or more tagged images
///
/// Created once by the aggregator and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub kind: PlaceKind,
    pub name: String,
    pub country: String,

    /// Previews in the order their images were encountered
    pub images: Vec<PreviewRef>,

    /// 1-based rank in the aggregator's output
    pub visit_order: u32,

    /// Minimum capture time over contributing images that had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_timestamp: Option<i64>,
}

impl Destination {
    pub fn photo_count(&self) -> usize {
        self.images.len()
    }

    pub fn is_dated(&self) -> bool {
        self.earliest_timestamp.is_some()
    }

    /// Display label, e.g. "Paris, France" or "Japan"
    pub fn label(&self) -> String {
        match self.kind {
            PlaceKind::City => format!("{}, {}", self.name, self.country),
            PlaceKind::Country => self.country.clone(),
        }
    }
}
