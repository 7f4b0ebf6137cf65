//! Stage 5: enforce resource ceilings and drop insignificant geometry.
//!
//! In order:
//!
//! 1. **Element ceiling** (fatal): the source tree may hold at most
//!    `max_elements` elements.
//! 2. **Command ceiling**: a path with more than `max_commands_per_path`
//!    command letters is dropped with a warning. If that leaves a document
//!    that had paths with none at all, the run fails.
//! 3. **Significance floor**: a path survives only if its estimated length is
//!    at least `max(8, skip_tiny_segments_px, 0.5 × stroke_width)`.
//! 4. **Capping**: keep the first [`MAX_PATHS`] in discovery order. If their
//!    summed length exceeds [`LENGTH_BUDGET`], greedily re-accept paths in
//!    order until the next one would overflow it; a greedy result with fewer
//!    than [`MIN_GREEDY_PATHS`] paths is replaced by the first
//!    `max(50, MAX_PATHS / 4)` paths regardless of length.
//!
//! Steps 3 and 4 each add at most one summarising warning.

use crate::config::ImportConfig;
use crate::document::{ExtractedDocument, RawPath, ValidatedDocument};
use crate::error::ImportError;
use crate::geometry::{count_commands, estimate_length};
use tracing::{debug, warn};

pub const MAX_PATHS: usize = 400;
pub const LENGTH_BUDGET: f64 = 1_500_000.0;
pub const MIN_GREEDY_PATHS: usize = 50;
pub const MIN_PATH_LENGTH: f64 = 8.0;

pub fn validate(
    doc: ExtractedDocument,
    config: &ImportConfig,
) -> Result<ValidatedDocument, ImportError> {
    let element_count = doc.parsed.root.element_count();
    if element_count > config.max_elements {
        return Err(ImportError::TooManyElements {
            count: element_count,
            max: config.max_elements,
        });
    }

    let ExtractedDocument {
        parsed,
        paths,
        mut warnings,
        ..
    } = doc;

    let paths = enforce_command_ceiling(paths, config.max_commands_per_path, &mut warnings)?;
    let paths = drop_insignificant(paths, config.skip_tiny_segments_px, &mut warnings);
    let paths = cap(paths, &mut warnings);

    debug!("validate: {} path(s) accepted", paths.len());
    Ok(ValidatedDocument {
        parsed,
        paths,
        warnings,
    })
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("validate: {message}");
    warnings.push(message);
}

fn enforce_command_ceiling(
    paths: Vec<RawPath>,
    max: usize,
    warnings: &mut Vec<String>,
) -> Result<Vec<RawPath>, ImportError> {
    let had_paths = !paths.is_empty();
    let mut first_offender = None;
    let mut kept = Vec::with_capacity(paths.len());

    for path in paths {
        let count = count_commands(&path.d);
        if count > max {
            let label = path.id.as_deref().unwrap_or("<anonymous>");
            push_warning(
                warnings,
                format!(
                    "Dropped path '{label}': {count} commands exceeds maxCommandsPerPath ({max})"
                ),
            );
            first_offender.get_or_insert(count);
        } else {
            kept.push(path);
        }
    }

    match first_offender {
        Some(count) if had_paths && kept.is_empty() => {
            Err(ImportError::TooManyCommands { count, max })
        }
        _ => Ok(kept),
    }
}

fn drop_insignificant(
    paths: Vec<RawPath>,
    skip_tiny: f64,
    warnings: &mut Vec<String>,
) -> Vec<RawPath> {
    let before = paths.len();
    let kept: Vec<RawPath> = paths
        .into_iter()
        .filter_map(|mut path| {
            let len = estimate_length(&path.d);
            let floor = MIN_PATH_LENGTH
                .max(skip_tiny)
                .max(0.5 * path.stroke_width.unwrap_or(0.0));
            if len >= floor {
                path.len = Some(len);
                Some(path)
            } else {
                None
            }
        })
        .collect();

    let dropped = before - kept.len();
    if dropped > 0 {
        push_warning(
            warnings,
            format!("Dropped {dropped} path(s) shorter than the minimum length"),
        );
    }
    kept
}

fn cap(mut paths: Vec<RawPath>, warnings: &mut Vec<String>) -> Vec<RawPath> {
    let before = paths.len();
    paths.truncate(MAX_PATHS);

    let total: f64 = paths.iter().map(path_len).sum();
    if total > LENGTH_BUDGET {
        let mut running = 0.0;
        let greedy = paths
            .iter()
            .take_while(|p| {
                running += path_len(p);
                running <= LENGTH_BUDGET
            })
            .count();
        let keep = if greedy < MIN_GREEDY_PATHS {
            MIN_GREEDY_PATHS.max(MAX_PATHS / 4)
        } else {
            greedy
        };
        paths.truncate(keep);
    }

    if paths.len() < before {
        let accepted: f64 = paths.iter().map(path_len).sum();
        push_warning(
            warnings,
            format!(
                "Capped paths from {before} to {} (accepted length {accepted:.1})",
                paths.len()
            ),
        );
    }
    paths
}

fn path_len(p: &RawPath) -> f64 {
    p.len.unwrap_or(0.0)
}
