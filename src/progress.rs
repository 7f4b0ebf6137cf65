//! Progress protocol for the six-stage import pipeline.
//!
//! Every run reports one [`ImportEvent`] per stage boundary, strictly in
//! stage order, followed by exactly one terminal event (`Done` or `Error`):
//!
//! ```text
//! Sanitize → Parse → Extract → Flatten → Validate → Normalize → Done
//!                                                   (or Error at any point)
//! ```
//!
//! Two ways to consume it:
//!
//! * Inject an [`Arc<dyn ImportProgressCallback>`] via
//!   [`crate::config::ImportConfigBuilder::progress_callback`]; the blocking
//!   [`crate::import::import_svg`] calls it inline.
//! * Use [`crate::orchestrator::Importer`], which forwards the same events
//!   over a channel from its background worker.
//!
//! # Example
//!
//! ```rust
//! use edgequake_svg2path::{ImportConfig, ImportEvent, ImportProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct StageCounter(AtomicUsize);
//!
//! impl ImportProgressCallback for StageCounter {
//!     fn on_event(&self, _event: &ImportEvent) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(StageCounter(AtomicUsize::new(0)));
//! let config = ImportConfig::builder()
//!     .progress_callback(counter.clone() as Arc<dyn ImportProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One progress event. Serialises with a `stage` tag, e.g.
/// `{"stage":"extract","elementsSeen":12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ImportEvent {
    /// Hostile content stripped.
    Sanitize,
    /// Element tree built, width/height/viewBox resolved.
    Parse {
        #[serde(skip_serializing_if = "Option::is_none")]
        read_bytes: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_bytes: Option<usize>,
    },
    /// Paths extracted; `elements_seen` counts elements visited by the walk.
    Extract { elements_seen: usize },
    /// Flattening done; `resolved_uses` counts resolved references.
    Flatten { resolved_uses: usize },
    /// Validation done; `paths` surviving.
    Validate { paths: usize },
    /// Normalisation done; `paths` in the final document.
    Normalize { paths: usize },
    /// Terminal: the document is ready.
    Done,
    /// Terminal: a fatal error aborted the run.
    Error { message: String },
}

impl ImportEvent {
    /// `true` for `Done` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportEvent::Done | ImportEvent::Error { .. })
    }

    /// Short stage label, used by the CLI spinner and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            ImportEvent::Sanitize => "sanitize",
            ImportEvent::Parse { .. } => "parse",
            ImportEvent::Extract { .. } => "extract",
            ImportEvent::Flatten { .. } => "flatten",
            ImportEvent::Validate { .. } => "validate",
            ImportEvent::Normalize { .. } => "normalize",
            ImportEvent::Done => "done",
            ImportEvent::Error { .. } => "error",
        }
    }
}

/// Receives pipeline progress events.
///
/// Implementations must be `Send + Sync`: the orchestrator invokes the
/// callback from its background worker thread. The default implementation
/// ignores every event.
pub trait ImportProgressCallback: Send + Sync {
    fn on_event(&self, event: &ImportEvent) {
        let _ = event;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ImportProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ImportConfig`].
pub type ProgressCallback = Arc<dyn ImportProgressCallback>;
