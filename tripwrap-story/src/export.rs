//! Snapshot export hand-off
//!
//! Rendering a slide to an image happens outside this crate. The player
//! only exposes the minimal context needed to do it and never waits for
//! the result.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Everything the export side gets to know about the story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportContext {
    pub slide_index: usize,
    pub profile_name: String,
}

/// Renders a snapshot of the current slide somewhere
pub trait SnapshotExporter: Send + Sync + 'static {
    fn export(&self, context: &ExportContext) -> anyhow::Result<()>;
}

/// Fire-and-forget export
///
/// Runs on the blocking pool. Failures are logged, not returned; the
/// returned handle may be dropped.
pub fn spawn_export(
    exporter: Arc<dyn SnapshotExporter>,
    context: ExportContext,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || match exporter.export(&context) {
        Ok(()) => debug!("Exported slide {}", context.slide_index),
        Err(e) => warn!("Export of slide {} failed: {:#}", context.slide_index, e),
    })
}
