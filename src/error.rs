//! Error types for the edgequake-svg2path library.
//!
//! Two severities exist and only one of them is an error type:
//!
//! * [`ImportError`] — **Fatal**: the import cannot produce any output
//!   (malformed length, element ceiling exceeded, user cancellation). Returned
//!   as `Err(ImportError)` from every entry point; output is all-or-nothing.
//!
//! * **Advisory** conditions (unresolved or cyclic references, dropped
//!   degenerate paths, capping truncation) are *not* errors. Each one appends a
//!   single line to the document's `warnings` list and processing continues.
//!
//! Cancellation is modelled as its own variant so callers can skip
//! user-visible error UI for aborts they initiated themselves.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-svg2path library.
#[derive(Debug, Error)]
pub enum ImportError {
    // ── Structural errors ─────────────────────────────────────────────────
    /// The text is not well-formed XML.
    #[error("Malformed document: {detail}")]
    MalformedDocument { detail: String },

    /// The document root element is not `<svg>`.
    #[error("Document root is <{root}>, expected <svg>")]
    NotSvg { root: String },

    /// A `width`/`height` value is not a number followed by an optional unit.
    #[error("Invalid length '{value}'")]
    InvalidLength { value: String },

    /// A `width`/`height` value carries a unit outside the px-per-unit table.
    #[error("Unsupported unit '{unit}' in length '{value}'")]
    UnsupportedUnit { unit: String, value: String },

    /// The `viewBox` attribute is not four finite numbers.
    #[error("Invalid viewBox '{value}': expected four finite numbers")]
    InvalidViewBox { value: String },

    // ── Resource ceilings ─────────────────────────────────────────────────
    /// The source tree holds more elements than `max_elements` allows.
    #[error("Document has {count} elements, which exceeds maxElements ({max})")]
    TooManyElements { count: usize, max: usize },

    /// Every path in the document was over the per-path command ceiling.
    #[error("Path has {count} commands, which exceeds maxCommandsPerPath ({max})")]
    TooManyCommands { count: usize, max: usize },

    // ── Orchestration ─────────────────────────────────────────────────────
    /// The run was cancelled by the caller or superseded by a newer run.
    #[error("Import cancelled")]
    Cancelled,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input document.
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed, or a partial options record did not parse.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (worker panic, broken channel).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImportError {
    /// `true` for the cancellation signal, `false` for processing failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ImportError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_elements_display() {
        let e = ImportError::TooManyElements {
            count: 12,
            max: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("exceeds maxElements"), "got: {msg}");
        assert!(msg.contains("12"));
    }

    #[test]
    fn too_many_commands_display() {
        let e = ImportError::TooManyCommands { count: 7, max: 5 };
        assert!(e.to_string().contains("exceeds maxCommandsPerPath"));
    }

    #[test]
    fn length_errors_display() {
        let e = ImportError::InvalidLength {
            value: "abc".into(),
        };
        assert!(e.to_string().contains("Invalid length"));

        let e = ImportError::UnsupportedUnit {
            unit: "em".into(),
            value: "3em".into(),
        };
        assert!(e.to_string().contains("Unsupported unit"));
        assert!(e.to_string().contains("3em"));
    }

    #[test]
    fn cancelled_is_distinguishable() {
        assert!(ImportError::Cancelled.is_cancelled());
        assert!(!ImportError::Internal("boom".into()).is_cancelled());
    }
}
