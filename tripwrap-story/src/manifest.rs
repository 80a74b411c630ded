//! Upload manifest loading
//!
//! A manifest is a JSON array of upload records, as produced by the upload
//! and EXIF side:
//!
//! ```json
//! [
//!   { "preview": "img/0001.jpg", "captured_at": 1704103200000,
//!     "suggested": { "lat": 48.85, "lng": 2.35, "city": "Paris", "country": "France" } },
//!   { "preview": "img/0002.jpg",
//!     "manual": { "kind": "country", "country": "Japan" } }
//! ]
//! ```
//!
//! `manual` records a hand-entered place and is validated by the tagging
//! session like any other manual entry.

use crate::error::{Error, Result};
use crate::tagging::TaggingSession;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};
use tripwrap_common::{ImageId, PlaceKind, PreviewRef, SuggestedLocation, TaggedImage};
use uuid::Uuid;

/// Hand-entered place, unvalidated
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManualEntry {
    pub kind: PlaceKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// One upload record
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub preview: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub captured_at: Option<i64>,
    #[serde(default)]
    pub suggested: Option<SuggestedLocation>,
    #[serde(default)]
    pub manual: Option<ManualEntry>,
}

impl ManifestEntry {
    fn to_image(&self) -> TaggedImage {
        let id = self.id.map(ImageId::from_uuid).unwrap_or_default();
        let mut image = TaggedImage::with_id(id, PreviewRef::new(self.preview.clone()));
        image.capture_timestamp = self.captured_at;
        image.suggested_location = self.suggested.clone();
        image
    }
}

/// Parsed manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Manifest(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let manifest = Self::from_json_str(&content)
            .map_err(|e| Error::Manifest(format!("{}: {}", path.display(), e)))?;
        info!(
            "Loaded {} upload record(s) from {}",
            manifest.entries.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Unresolved images in manifest order
    pub fn images(&self) -> Vec<TaggedImage> {
        self.entries.iter().map(ManifestEntry::to_image).collect()
    }

    /// Tag every image without a human in the loop
    ///
    /// Per image: a manual entry wins; otherwise the suggestion is confirmed
    /// when `accept_suggestions` is set; otherwise the image is skipped.
    /// Entries that fail validation are skipped with a warning, since there
    /// is nobody to re-prompt.
    pub fn tag(&self, accept_suggestions: bool) -> Result<Vec<TaggedImage>> {
        let mut session = TaggingSession::new(self.images());

        for entry in &self.entries {
            let outcome = match (&entry.manual, accept_suggestions, &entry.suggested) {
                (Some(manual), _, _) => {
                    session.submit_manual(manual.kind, &manual.name, &manual.country)
                }
                (None, true, Some(_)) => session.confirm_suggestion(),
                _ => session.skip(),
            };

            match outcome {
                Ok(()) => {}
                Err(e @ (Error::Validation(_) | Error::NoSuggestion { .. })) => {
                    warn!("Skipping {}: {}", entry.preview, e);
                    session.skip()?;
                }
                Err(e) => return Err(e),
            }
        }

        session.finish()
    }
}
