//! Stage records.
//!
//! Each pipeline stage consumes the previous record by value and produces a
//! new one; nothing is shared between stages or between runs. `warnings` is
//! append-only from extraction onwards.
//!
//! ```text
//! ParsedDocument ─extract→ ExtractedDocument ─flatten→ ExtractedDocument
//!                ─validate→ ValidatedDocument ─normalize→ ImportedDocument
//! ```

use crate::tree::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[min-x, min-y, width, height]`, always four finite numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewBox(pub [f64; 4]);

impl ViewBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self([x, y, w, h])
    }

    pub fn width(&self) -> f64 {
        self.0[2]
    }

    pub fn height(&self) -> f64 {
        self.0[3]
    }
}

/// Output of the structural parser.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub root: Element,
    /// Resolved to pixel-equivalent units (already scaled by `unit_px`).
    pub width: f64,
    pub height: f64,
    pub view_box: ViewBox,
    /// Elements dropped for nesting too deep to walk safely.
    pub pruned_elements: usize,
}

/// Which source element a path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Path,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
}

impl ShapeKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "path" => Self::Path,
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "polyline" => Self::Polyline,
            "polygon" => Self::Polygon,
            _ => return None,
        })
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
        };
        f.write_str(s)
    }
}

/// One extracted path. `d` holds only absolute `M L C S Q Z` commands.
///
/// Style values are captured verbatim; the normalizer canonicalises them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Estimated length; filled in by the validator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<f64>,
    pub kind: ShapeKind,
}

/// Counters collected during extraction, reported through progress events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStats {
    /// Elements visited by the walk, including those reached through `use`.
    pub elements_seen: usize,
    /// `use` references that resolved to an element.
    pub resolved_uses: usize,
}

/// Output of the extractor (and the flattener).
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub parsed: ParsedDocument,
    pub paths: Vec<RawPath>,
    pub warnings: Vec<String>,
    pub stats: ExtractStats,
}

/// Output of the validator: paths filtered and capped, `len` set on each.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    pub parsed: ParsedDocument,
    pub paths: Vec<RawPath>,
    pub warnings: Vec<String>,
}

/// Per-path metadata carried into the final record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMeta {
    pub kind: ShapeKind,
    pub length: f64,
}

/// One path of the final document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// FNV-1a content hash of `d|stroke|fill|strokeWidth|opacity`.
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PathMeta>,
}

/// The final, all-or-nothing result of one import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedDocument {
    pub width: f64,
    pub height: f64,
    pub view_box: ViewBox,
    pub paths: Vec<ImportedPath>,
    pub warnings: Vec<String>,
}
