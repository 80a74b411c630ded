//! Location tagging session
//!
//! Walks the uploaded images one at a time. For each image the caller
//! either confirms the geocoder suggestion, enters a place manually, or
//! skips it. Decisions are final: the cursor only moves forward, and once
//! every image has been decided [`TaggingSession::finish`] hands the list
//! to the aggregator.

use crate::error::{Error, Result, ValidationError};
use tracing::{debug, info};
use tripwrap_common::{ImageId, PlaceKind, ResolvedLocation, TaggedImage};

/// One-pass tagging over an ordered image list
#[derive(Debug, Clone)]
pub struct TaggingSession {
    images: Vec<TaggedImage>,

    /// Index of the image awaiting a decision
    cursor: usize,

    skipped: usize,
}

impl TaggingSession {
    pub fn new(images: Vec<TaggedImage>) -> Self {
        info!("Tagging session started with {} image(s)", images.len());
        Self {
            images,
            cursor: 0,
            skipped: 0,
        }
    }

    /// Image awaiting a decision, or None once all are decided
    pub fn current(&self) -> Option<&TaggedImage> {
        self.images.get(self.cursor)
    }

    /// All images, decided and pending
    pub fn images(&self) -> &[TaggedImage] {
        &self.images
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.images.len()
    }

    /// (decided, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor.min(self.images.len()), self.images.len())
    }

    /// Number of images skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Accept the geocoder's suggestion for the current image
    ///
    /// A suggestion with a city becomes a city location, otherwise a
    /// country location. A missing suggestion, or one without a country,
    /// cannot be confirmed and yields [`Error::NoSuggestion`].
    pub fn confirm_suggestion(&mut self) -> Result<()> {
        let image = self.current().ok_or(Error::SessionFinished)?;
        let image_id = image.id();

        let suggestion = image
            .suggested_location
            .as_ref()
            .ok_or(Error::NoSuggestion { image_id })?;

        let country = non_blank(suggestion.country.as_deref())
            .ok_or(Error::NoSuggestion { image_id })?;

        let location = match non_blank(suggestion.city.as_deref()) {
            Some(city) => ResolvedLocation::city(city, country)?,
            None => ResolvedLocation::country(country)?,
        };

        debug!("Image {} confirmed as {}", image_id, location);
        self.commit(Some(location));
        Ok(())
    }

    /// Enter a place by hand for the current image
    ///
    /// On a validation failure the cursor does not move, so the same image
    /// can be re-prompted.
    pub fn submit_manual(&mut self, kind: PlaceKind, name: &str, country: &str) -> Result<()> {
        let image = self.current().ok_or(Error::SessionFinished)?;
        let image_id = image.id();

        let country = non_blank(Some(country)).ok_or(ValidationError::MissingCountry)?;

        let location = match kind {
            PlaceKind::City => {
                let name = non_blank(Some(name)).ok_or(ValidationError::MissingCityName)?;
                ResolvedLocation::city(name, country)?
            }
            PlaceKind::Country => ResolvedLocation::country(country)?,
        };

        debug!("Image {} manually tagged as {}", image_id, location);
        self.commit(Some(location));
        Ok(())
    }

    /// Leave the current image unresolved
    pub fn skip(&mut self) -> Result<()> {
        let image = self.current().ok_or(Error::SessionFinished)?;
        debug!("Image {} skipped", image.id());
        self.skipped += 1;
        self.commit(None);
        Ok(())
    }

    /// Drop an image from the session entirely
    ///
    /// The cursor keeps pointing at the same pending image.
    pub fn remove(&mut self, id: ImageId) -> Option<TaggedImage> {
        let index = self.images.iter().position(|img| img.id() == id)?;
        let removed = self.images.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
            if removed.resolved_location.is_none() {
                self.skipped = self.skipped.saturating_sub(1);
            }
        }
        debug!("Image {} removed from session", id);
        Some(removed)
    }

    /// Hand the final image list to the next stage
    pub fn finish(self) -> Result<Vec<TaggedImage>> {
        if !self.is_finished() {
            return Err(Error::SessionIncomplete {
                remaining: self.images.len() - self.cursor,
            });
        }
        info!(
            "Tagging session finished: {} image(s), {} skipped",
            self.images.len(),
            self.skipped
        );
        Ok(self.images)
    }

    fn commit(&mut self, location: Option<ResolvedLocation>) {
        if let Some(image) = self.images.get_mut(self.cursor) {
            image.resolved_location = location;
            self.cursor += 1;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
