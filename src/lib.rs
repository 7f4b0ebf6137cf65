//! # edgequake-svg2path
//!
//! Import untrusted SVG documents as a safe, canonical, fully-flattened list
//! of absolute paths.
//!
//! ## Why this crate?
//!
//! SVG from third parties is hostile by default: it can carry scripts,
//! embedded HTML, references to remote resources, and geometry pathological
//! enough to stall a renderer. Downstream drawing surfaces also don't want
//! to re-implement nested transforms, `<use>` references or arc math. This
//! crate strips the hazards, bakes every transform into absolute
//! coordinates, turns every primitive shape and arc into `M L C S Q Z`
//! commands, and bounds the cost of what it hands back.
//!
//! ## Pipeline Overview
//!
//! ```text
//! SVG text
//!  │
//!  ├─ 1. Sanitize   drop script / foreign content / on* / external href
//!  ├─ 2. Parse      element tree, width/height/viewBox with units
//!  ├─ 3. Extract    transforms, <use>, shapes, arcs → absolute path data
//!  ├─ 4. Flatten    seam for deferred transforms (identity)
//!  ├─ 5. Validate   element/command ceilings, length floor, capping
//!  └─ 6. Normalize  #rrggbb paint + FNV-1a content hash
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use edgequake_svg2path::{import_svg, ImportConfig};
//!
//! let svg = r#"<svg width="100" height="50">
//!     <g transform="translate(10 0)"><circle cx="20" cy="20" r="10" fill="red"/></g>
//! </svg>"#;
//! let doc = import_svg(svg, &ImportConfig::default()).unwrap();
//! assert_eq!(doc.paths.len(), 1);
//! assert_eq!(doc.paths[0].fill.as_deref(), Some("#ff0000"));
//! assert!(doc.paths[0].d.starts_with("M40 20 C"));
//! ```
//!
//! For progress reporting and cancellation, see [`Importer`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `svg2path` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-svg2path = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod import;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod tree;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ColorResolution, ImportConfig, ImportConfigBuilder};
pub use document::{
    ExtractStats, ExtractedDocument, ImportedDocument, ImportedPath, ParsedDocument, PathMeta,
    RawPath, ShapeKind, ValidatedDocument, ViewBox,
};
pub use error::ImportError;
pub use geometry::AffineMatrix;
pub use import::{import_file, import_svg, import_svg_async, import_to_file, write_json_atomic};
pub use orchestrator::{ImportCanceller, ImportEventStream, ImportHandle, Importer};
pub use progress::{ImportEvent, ImportProgressCallback, NoopProgressCallback, ProgressCallback};
