//! Stage 6: canonicalise paint values and hash each path.

use crate::config::{ColorResolution, ImportConfig};
use crate::document::{ImportedDocument, ImportedPath, PathMeta, RawPath, ValidatedDocument};
use std::str::FromStr;
use tracing::debug;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Names known to [`ColorResolution::Basic`].
const BASIC_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
];

pub fn normalize(doc: ValidatedDocument, config: &ImportConfig) -> ImportedDocument {
    let ValidatedDocument {
        parsed,
        paths,
        warnings,
    } = doc;

    let paths: Vec<ImportedPath> = paths
        .into_iter()
        .map(|p| normalize_path(p, config.color_resolution))
        .collect();
    debug!("normalize: {} path(s)", paths.len());

    ImportedDocument {
        width: parsed.width,
        height: parsed.height,
        view_box: parsed.view_box,
        paths,
        warnings,
    }
}

fn normalize_path(path: RawPath, mode: ColorResolution) -> ImportedPath {
    let fill = normalize_paint(path.fill.as_deref(), mode);
    let stroke = normalize_paint(path.stroke.as_deref(), mode);
    let hash = content_hash(
        &path.d,
        Some(&stroke),
        Some(&fill),
        path.stroke_width,
        path.opacity,
    );
    ImportedPath {
        id: path.id,
        d: path.d,
        fill: Some(fill),
        stroke: Some(stroke),
        stroke_width: path.stroke_width,
        opacity: path.opacity,
        hash,
        meta: Some(PathMeta {
            kind: path.kind,
            length: path.len.unwrap_or(0.0),
        }),
    }
}

/// Canonical paint value.
///
/// Absent, `none` and `transparent` become `none`; anything the chosen
/// resolver understands becomes `#rrggbb`; the rest passes through unchanged.
pub fn normalize_paint(value: Option<&str>, mode: ColorResolution) -> String {
    let Some(raw) = value.map(str::trim) else {
        return "none".to_string();
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("transparent")
    {
        return "none".to_string();
    }
    let resolved = match mode {
        ColorResolution::Full => svgtypes::Color::from_str(raw)
            .ok()
            .map(|c| format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)),
        ColorResolution::Basic => BASIC_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(raw))
            .map(|(_, hex)| (*hex).to_string()),
    };
    resolved.unwrap_or_else(|| raw.to_string())
}

/// FNV-1a over `d|stroke|fill|strokeWidth|opacity`, absent fields empty,
/// rendered as lowercase hex without padding.
pub fn content_hash(
    d: &str,
    stroke: Option<&str>,
    fill: Option<&str>,
    stroke_width: Option<f64>,
    opacity: Option<f64>,
) -> String {
    let num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    let key = format!(
        "{d}|{}|{}|{}|{}",
        stroke.unwrap_or(""),
        fill.unwrap_or(""),
        num(stroke_width),
        num(opacity)
    );
    format!("{:x}", fnv1a(key.as_bytes()))
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ u32::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
