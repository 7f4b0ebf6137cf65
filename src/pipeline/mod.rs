//! The six import stages.
//!
//! Each submodule implements exactly one step and consumes the previous
//! step's record by value. Stages are pure apart from `tracing` output; the
//! only shared state is the append-only `warnings` list carried inside the
//! records.
//!
//! ## Data Flow
//!
//! ```text
//! text ──▶ sanitize ──▶ parse ──▶ extract ──▶ flatten ──▶ validate ──▶ normalize
//!          (String)   (Parsed)  (Extracted) (Extracted) (Validated)  (Imported)
//! ```
//!
//! 1. [`sanitize`]  — drop scripts, foreign content, handlers, external hrefs
//! 2. [`parse`]     — element tree plus width/height/viewBox with units
//! 3. [`extract`]   — transforms, `use` references, shapes and arcs → `d`
//! 4. [`flatten`]   — seam for deferred transforms; identity today
//! 5. [`validate`]  — element/command ceilings, significance floor, capping
//! 6. [`normalize`] — `#rrggbb` paint and a content hash per path
//!
//! [`run_stages`] drives all six in order with a progress sink and a
//! cancellation probe; both the blocking API and the orchestrator use it.

pub mod extract;
pub mod flatten;
pub mod normalize;
pub mod parse;
pub mod sanitize;
pub mod validate;

use crate::config::ImportConfig;
use crate::document::ImportedDocument;
use crate::error::ImportError;
use crate::progress::ImportEvent;
use std::time::Instant;
use tracing::{debug, info};

/// Run all six stages over `text`.
///
/// `emit` receives one event per stage boundary and then `Done` or `Error`.
/// `is_cancelled` is probed before every event; once it returns `true` the
/// run stops with [`ImportError::Cancelled`] and nothing more is emitted.
pub fn run_stages(
    text: &str,
    config: &ImportConfig,
    mut emit: impl FnMut(ImportEvent),
    is_cancelled: impl Fn() -> bool,
) -> Result<ImportedDocument, ImportError> {
    let start = Instant::now();
    let result = stages(text, config, &mut emit, &is_cancelled);

    match &result {
        Ok(doc) => {
            if is_cancelled() {
                return Err(ImportError::Cancelled);
            }
            emit(ImportEvent::Done);
            info!(
                "Import complete: {} path(s), {} warning(s), {}ms",
                doc.paths.len(),
                doc.warnings.len(),
                start.elapsed().as_millis()
            );
        }
        Err(ImportError::Cancelled) => debug!("Import cancelled"),
        Err(e) => {
            if !is_cancelled() {
                emit(ImportEvent::Error {
                    message: e.to_string(),
                });
            }
            info!("Import failed after {}ms: {e}", start.elapsed().as_millis());
        }
    }
    result
}

fn stages(
    text: &str,
    config: &ImportConfig,
    emit: &mut impl FnMut(ImportEvent),
    is_cancelled: &impl Fn() -> bool,
) -> Result<ImportedDocument, ImportError> {
    let mut boundary = |event: ImportEvent| -> Result<(), ImportError> {
        if is_cancelled() {
            return Err(ImportError::Cancelled);
        }
        debug!("stage boundary: {}", event.label());
        emit(event);
        Ok(())
    };

    if is_cancelled() {
        return Err(ImportError::Cancelled);
    }
    let (sanitized, report) = sanitize::sanitize_with_report(text);
    boundary(ImportEvent::Sanitize)?;

    let mut parsed = parse::parse(&sanitized, config.unit_px)?;
    parsed.pruned_elements += report.pruned_elements;
    drop(sanitized);
    boundary(ImportEvent::Parse {
        read_bytes: Some(text.len()),
        total_bytes: Some(text.len()),
    })?;

    let extracted = extract::extract(parsed, config);
    let elements_seen = extracted.stats.elements_seen;
    boundary(ImportEvent::Extract { elements_seen })?;

    let flattened = flatten::flatten(extracted, config);
    let resolved_uses = flattened.stats.resolved_uses;
    boundary(ImportEvent::Flatten { resolved_uses })?;

    let validated = validate::validate(flattened, config)?;
    boundary(ImportEvent::Validate {
        paths: validated.paths.len(),
    })?;

    let imported = normalize::normalize(validated, config);
    boundary(ImportEvent::Normalize {
        paths: imported.paths.len(),
    })?;

    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const LINE: &str = r#"<svg width="20" height="10"><path d="M0 0 L10 0"/></svg>"#;

    #[test]
    fn emits_every_boundary_in_order() {
        let mut labels = Vec::new();
        let doc = run_stages(
            LINE,
            &ImportConfig::default(),
            |e| labels.push(e.label()),
            || false,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(
            labels,
            vec!["sanitize", "parse", "extract", "flatten", "validate", "normalize", "done"]
        );
    }

    #[test]
    fn failure_ends_with_error_event() {
        let mut events = Vec::new();
        let err = run_stages(
            r#"<svg width="3em"/>"#,
            &ImportConfig::default(),
            |e| events.push(e),
            || false,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedUnit { .. }));
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], ImportEvent::Error { message } if message.contains("Unsupported unit")));
    }

    #[test]
    fn cancellation_stops_at_next_boundary_silently() {
        let probes = Cell::new(0);
        let mut labels = Vec::new();
        let err = run_stages(
            LINE,
            &ImportConfig::default(),
            |e| labels.push(e.label()),
            || {
                probes.set(probes.get() + 1);
                probes.get() > 3
            },
        )
        .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(labels, vec!["sanitize", "parse"]);
    }
}
