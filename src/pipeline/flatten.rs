//! Stage 4: flatten deferred transforms.
//!
//! The extractor already bakes every transform into absolute coordinates, so
//! this stage passes the record through unchanged for both values of
//! `flatten_transforms`. It stays in the pipeline so an extractor that keeps
//! transforms symbolic can be swapped in without changing the stage contract.

use crate::config::ImportConfig;
use crate::document::ExtractedDocument;
use tracing::debug;

pub fn flatten(doc: ExtractedDocument, config: &ImportConfig) -> ExtractedDocument {
    debug!(
        "flatten: {} path(s), flatten_transforms={} (transforms already baked)",
        doc.paths.len(),
        config.flatten_transforms
    );
    doc
}
