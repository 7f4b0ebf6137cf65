//! Stage 2: build the element tree and resolve document dimensions.
//!
//! `width` / `height` accept a number with an optional unit from a fixed
//! px-per-unit table; everything is multiplied by `unit_px`. A `viewBox`
//! backfills missing dimensions; without one the implicit viewBox is
//! `[0, 0, width, height]`.

use crate::document::{ParsedDocument, ViewBox};
use crate::error::ImportError;
use crate::tree;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_LENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*([A-Za-z%]*)\s*$").unwrap()
});

/// Pixels per unit. `%` resolves to 1 per percent.
fn px_per_unit(unit: &str) -> Option<f64> {
    Some(match unit {
        "" | "px" => 1.0,
        "mm" => 96.0 / 25.4,
        "cm" => 96.0 / 2.54,
        "in" => 96.0,
        "pt" => 96.0 / 72.0,
        "pc" => 16.0,
        "%" => 1.0,
        _ => return None,
    })
}

/// Parse sanitized text into a [`ParsedDocument`].
pub fn parse(text: &str, unit_px: f64) -> Result<ParsedDocument, ImportError> {
    let (root, pruned_elements) =
        tree::parse_document_counting_pruned(text).map_err(|e| {
            ImportError::MalformedDocument {
                detail: e.to_string(),
            }
        })?;
    if root.name != "svg" {
        return Err(ImportError::NotSvg { root: root.name });
    }

    let width = root.attr("width").map(|v| parse_length(v, unit_px)).transpose()?;
    let height = root.attr("height").map(|v| parse_length(v, unit_px)).transpose()?;
    let view_box = root.attr("viewBox").map(parse_view_box).transpose()?;

    let (width, height, view_box) = match view_box {
        Some(vb) => (
            width.unwrap_or(vb.width() * unit_px),
            height.unwrap_or(vb.height() * unit_px),
            vb,
        ),
        None => {
            let w = width.unwrap_or(0.0);
            let h = height.unwrap_or(0.0);
            (w, h, ViewBox::new(0.0, 0.0, w, h))
        }
    };

    debug!(
        "parse: {}x{} viewBox={:?}, {} elements",
        width,
        height,
        view_box.0,
        root.element_count()
    );

    Ok(ParsedDocument {
        root,
        width,
        height,
        view_box,
        pruned_elements,
    })
}

/// Resolve a length attribute to pixel-equivalent units, scaled by `unit_px`.
pub fn parse_length(value: &str, unit_px: f64) -> Result<f64, ImportError> {
    let caps = RE_LENGTH
        .captures(value)
        .ok_or_else(|| ImportError::InvalidLength {
            value: value.to_string(),
        })?;
    let number: f64 = caps[1]
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| ImportError::InvalidLength {
            value: value.to_string(),
        })?;
    let unit = &caps[2];
    let scale = px_per_unit(unit).ok_or_else(|| ImportError::UnsupportedUnit {
        unit: unit.to_string(),
        value: value.to_string(),
    })?;
    Ok(number * scale * unit_px)
}

/// Four finite numbers separated by whitespace and/or commas.
pub fn parse_view_box(value: &str) -> Result<ViewBox, ImportError> {
    let invalid = || ImportError::InvalidViewBox {
        value: value.to_string(),
    };
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(invalid)?;
    match numbers.as_slice() {
        [x, y, w, h] => Ok(ViewBox::new(*x, *y, *w, *h)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn millimetres_convert_to_pixels() {
        let doc = parse(r#"<svg width="10mm" height="20mm"/>"#, 1.0).unwrap();
        assert!(approx(doc.width, 37.795), "{}", doc.width);
        assert!(approx(doc.height, 75.59), "{}", doc.height);
        assert_eq!(doc.view_box, ViewBox::new(0.0, 0.0, doc.width, doc.height));
    }

    #[test]
    fn unit_table() {
        assert!(approx(parse_length("1in", 1.0).unwrap(), 96.0));
        assert!(approx(parse_length("1cm", 1.0).unwrap(), 37.795));
        assert!(approx(parse_length("72pt", 1.0).unwrap(), 96.0));
        assert!(approx(parse_length("1pc", 1.0).unwrap(), 16.0));
        assert!(approx(parse_length("50%", 1.0).unwrap(), 50.0));
        assert!(approx(parse_length(" 12.5px ", 2.0).unwrap(), 25.0));
        assert!(approx(parse_length("1e2", 1.0).unwrap(), 100.0));
    }

    #[test]
    fn bad_lengths_are_fatal() {
        let err = parse_length("abc", 1.0).unwrap_err();
        assert!(err.to_string().contains("Invalid length"));
        let err = parse_length("3em", 1.0).unwrap_err();
        assert!(err.to_string().contains("Unsupported unit"));
        assert!(parse(r#"<svg width="wide"/>"#, 1.0).is_err());
    }

    #[test]
    fn view_box_backfills_dimensions() {
        let doc = parse(r#"<svg viewBox="0,0 200 100"/>"#, 1.0).unwrap();
        assert_eq!(doc.width, 200.0);
        assert_eq!(doc.height, 100.0);

        let doc = parse(r#"<svg width="50" viewBox="0 0 200 100"/>"#, 1.0).unwrap();
        assert_eq!(doc.width, 50.0);
        assert_eq!(doc.height, 100.0);
    }

    #[test]
    fn bad_view_box_is_fatal() {
        assert!(matches!(
            parse(r#"<svg viewBox="0 0 10"/>"#, 1.0),
            Err(ImportError::InvalidViewBox { .. })
        ));
        assert!(parse_view_box("0 0 a 1").is_err());
    }

    #[test]
    fn no_dimensions_default_to_zero() {
        let doc = parse("<svg/>", 1.0).unwrap();
        assert_eq!((doc.width, doc.height), (0.0, 0.0));
        assert_eq!(doc.view_box, ViewBox::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn structural_failures() {
        assert!(matches!(
            parse("<svg><g></svg>", 1.0),
            Err(ImportError::MalformedDocument { .. })
        ));
        assert!(matches!(
            parse("<html/>", 1.0),
            Err(ImportError::NotSvg { .. })
        ));
    }
}
