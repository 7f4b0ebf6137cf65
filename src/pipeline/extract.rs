//! Stage 3: walk the element tree and emit absolute path data.
//!
//! The walk is a plain recursion over `(element, matrix, depth, style)`;
//! every branch receives its own copy of the accumulated matrix and inherited
//! style, so siblings never observe each other's state.
//!
//! ## `use` resolution
//!
//! A reference is resolved against a first-wins id map and walked with
//! `acc · transform(use) · translate(x, y)`. Two guards keep the walk finite:
//!
//! - a depth limit of [`MAX_REFERENCE_DEPTH`] nested resolutions
//! - a "currently visiting" stack keyed by element identity; meeting an
//!   element already on the stack is a cycle. Re-using the same target from
//!   separate branches is fine.
//!
//! A third guard stops resolving references once the walk has visited more
//! than `max_elements` elements, which bounds fan-out through nested `use`.
//!
//! None of these abort the extraction: each one records a warning and skips
//! the offending branch.

use crate::config::ImportConfig;
use crate::document::{ExtractStats, ExtractedDocument, ParsedDocument, RawPath, ShapeKind};
use crate::geometry::arc::{arc_to_cubics, ArcApprox};
use crate::geometry::matrix::parse_number_list;
use crate::geometry::path::{AbsSegment, AbsolutePath};
use crate::geometry::{parse_transform_list, AffineMatrix, PathWriter};
use crate::tree::{Element, MAX_NESTING};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Maximum number of nested `use` resolutions on one branch.
pub const MAX_REFERENCE_DEPTH: usize = 10;

/// Circle/ellipse quarter-arc control distance, as a fraction of the radius.
const KAPPA: f64 = 0.552_284_749_8;

const GROUP_ELEMENTS: &[&str] = &["svg", "g", "a", "switch"];

/// Containers whose content is only drawn when referenced.
const NON_RENDERED: &[&str] = &[
    "defs", "symbol", "clipPath", "mask", "marker", "pattern", "style", "title", "desc", "metadata",
];

/// Extract every drawable shape of `parsed` as absolute path data.
pub fn extract(parsed: ParsedDocument, config: &ImportConfig) -> ExtractedDocument {
    let (paths, warnings, stats) = {
        let mut walker = Walker::new(&parsed.root, config);
        if parsed.pruned_elements > 0 {
            walker.warn(format!(
                "Dropped {} element(s) nested deeper than {} levels",
                parsed.pruned_elements,
                MAX_NESTING
            ));
        }
        walker.walk(&parsed.root, AffineMatrix::IDENTITY, 0, &Style::default(), false);
        (walker.paths, walker.warnings, walker.stats)
    };
    debug!(
        "extract: {} path(s) from {} element(s), {} reference(s) resolved",
        paths.len(),
        stats.elements_seen,
        stats.resolved_uses
    );
    ExtractedDocument {
        parsed,
        paths,
        warnings,
        stats,
    }
}

// ── Inherited style ──────────────────────────────────────────────────────

/// `fill`, `stroke`, `stroke-width` and `opacity` in effect for an element.
///
/// Paint and stroke width are inherited as-is; opacity multiplies down the
/// chain.
#[derive(Debug, Clone, Default)]
struct Style {
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<f64>,
    opacity: Option<f64>,
}

impl Style {
    fn inherit(&self, el: &Element) -> Style {
        let decls = style_declarations(el);
        let lookup = |name: &str| -> Option<String> {
            decls
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .or_else(|| el.attr(name).map(|v| v.trim().to_string()))
                .filter(|v| !v.is_empty() && v != "inherit")
        };

        let opacity = match (self.opacity, lookup("opacity").and_then(|v| parse_number(&v))) {
            (Some(a), Some(b)) => Some(a * b.clamp(0.0, 1.0)),
            (None, own) => own.map(|v| v.clamp(0.0, 1.0)),
            (inherited, None) => inherited,
        };

        Style {
            fill: lookup("fill").or_else(|| self.fill.clone()),
            stroke: lookup("stroke").or_else(|| self.stroke.clone()),
            stroke_width: lookup("stroke-width")
                .and_then(|v| parse_number(&v))
                .or(self.stroke_width),
            opacity,
        }
    }
}

/// `style="a: b; c: d"` as `(name, value)` pairs, in order.
fn style_declarations(el: &Element) -> Vec<(String, String)> {
    let Some(style) = el.attr("style") else {
        return Vec::new();
    };
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let v = v.trim().trim_end_matches("!important").trim();
            Some((k.trim().to_string(), v.to_string()))
        })
        .collect()
}

/// Leading number of an attribute value; a trailing `px` is accepted.
fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn num_attr(el: &Element, name: &str) -> Option<f64> {
    el.attr(name).and_then(parse_number)
}

// ── Walker ───────────────────────────────────────────────────────────────

struct Walker<'a> {
    ids: HashMap<&'a str, &'a Element>,
    skip_tiny: f64,
    max_elements: usize,
    /// Targets currently being resolved, outermost first, with their ids.
    visiting: Vec<(&'a Element, &'a str)>,
    expansion_stopped: bool,
    paths: Vec<RawPath>,
    warnings: Vec<String>,
    stats: ExtractStats,
}

impl<'a> Walker<'a> {
    fn new(root: &'a Element, config: &ImportConfig) -> Self {
        let mut ids = HashMap::new();
        for el in root.descendants() {
            if let Some(id) = el.attr("id") {
                ids.entry(id).or_insert(el);
            }
        }
        Self {
            ids,
            skip_tiny: config.skip_tiny_segments_px,
            max_elements: config.max_elements,
            visiting: Vec::new(),
            expansion_stopped: false,
            paths: Vec::new(),
            warnings: Vec::new(),
            stats: ExtractStats::default(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("extract: {message}");
        self.warnings.push(message);
    }

    fn walk(
        &mut self,
        el: &'a Element,
        matrix: AffineMatrix,
        depth: usize,
        style: &Style,
        referenced: bool,
    ) {
        self.stats.elements_seen += 1;
        let name = el.name.as_str();

        if name == "use" {
            self.resolve_use(el, matrix, depth, style);
            return;
        }

        if let Some(kind) = ShapeKind::from_tag(name) {
            let matrix = matrix.mul(own_transform(el));
            let style = style.inherit(el);
            self.emit_shape(el, kind, matrix, &style);
            return;
        }

        let is_group = GROUP_ELEMENTS.contains(&name);
        let drawable_here = is_group || (referenced && NON_RENDERED.contains(&name));
        if !drawable_here {
            return;
        }

        let matrix = matrix.mul(own_transform(el));
        let style = style.inherit(el);
        // Conditional attributes are not evaluated, so a switch always picks
        // its first child.
        let limit = if name == "switch" { 1 } else { usize::MAX };
        for child in el.child_elements().take(limit) {
            self.walk(child, matrix, depth, &style, false);
        }
    }

    fn resolve_use(&mut self, el: &'a Element, matrix: AffineMatrix, depth: usize, style: &Style) {
        let Some(href) = el.href().map(str::trim) else {
            self.warn("Reference element without href skipped".to_string());
            return;
        };
        let Some(id) = href.strip_prefix('#') else {
            self.warn(format!(
                "Unresolved reference '{href}': only local #id references are supported"
            ));
            return;
        };
        let Some(&target) = self.ids.get(id) else {
            self.warn(format!("Unresolved reference '#{id}'"));
            return;
        };

        if depth >= MAX_REFERENCE_DEPTH {
            self.warn(format!(
                "Reference depth limit ({MAX_REFERENCE_DEPTH}) exceeded at '#{id}', branch skipped"
            ));
            return;
        }
        if self.visiting.iter().any(|(v, _)| std::ptr::eq(*v, target)) {
            let chain: Vec<&str> = self
                .visiting
                .iter()
                .map(|(_, vid)| *vid)
                .chain(std::iter::once(id))
                .collect();
            self.warn(format!("Reference cycle detected: {}", chain.join(" -> ")));
            return;
        }
        if self.stats.elements_seen > self.max_elements {
            if !self.expansion_stopped {
                self.expansion_stopped = true;
                self.warn(format!(
                    "Reference expansion stopped after {} elements (maxElements {})",
                    self.stats.elements_seen, self.max_elements
                ));
            }
            return;
        }

        let x = num_attr(el, "x").unwrap_or(0.0);
        let y = num_attr(el, "y").unwrap_or(0.0);
        let matrix = matrix
            .mul(own_transform(el))
            .mul(AffineMatrix::translate(x, y));
        let style = style.inherit(el);

        self.stats.resolved_uses += 1;
        self.visiting.push((target, id));
        self.walk(target, matrix, depth + 1, &style, true);
        self.visiting.pop();
    }

    fn emit_shape(&mut self, el: &Element, kind: ShapeKind, m: AffineMatrix, style: &Style) {
        let mut w = PathWriter::new(self.skip_tiny);
        match kind {
            ShapeKind::Path => self.write_path(el, m, &mut w),
            ShapeKind::Rect => write_rect(el, m, &mut w),
            ShapeKind::Circle => {
                if let Some(r) = num_attr(el, "r") {
                    write_ellipse(el, r, r, m, &mut w);
                }
            }
            ShapeKind::Ellipse => {
                if let (Some(rx), Some(ry)) = (num_attr(el, "rx"), num_attr(el, "ry")) {
                    write_ellipse(el, rx, ry, m, &mut w);
                }
            }
            ShapeKind::Line => {
                let p1 = (num_attr(el, "x1").unwrap_or(0.0), num_attr(el, "y1").unwrap_or(0.0));
                let p2 = (num_attr(el, "x2").unwrap_or(0.0), num_attr(el, "y2").unwrap_or(0.0));
                w.move_to(apply(m, p1));
                w.line_to(apply(m, p2));
            }
            ShapeKind::Polyline | ShapeKind::Polygon => {
                let coords = el.attr("points").map(parse_number_list).unwrap_or_default();
                let points: Vec<(f64, f64)> =
                    coords.chunks_exact(2).map(|c| (c[0], c[1])).collect();
                if points.len() >= 2 {
                    w.move_to(apply(m, points[0]));
                    for p in &points[1..] {
                        w.line_to(apply(m, *p));
                    }
                    if kind == ShapeKind::Polygon {
                        w.close();
                    }
                }
            }
        }

        let Some(d) = w.finish() else { return };
        self.paths.push(RawPath {
            id: el.attr("id").map(str::to_string),
            d,
            fill: style.fill.clone(),
            stroke: style.stroke.clone(),
            stroke_width: style.stroke_width,
            opacity: style.opacity,
            len: None,
            kind,
        });
    }

    fn write_path(&mut self, el: &Element, m: AffineMatrix, w: &mut PathWriter) {
        let Some(d) = el.attr("d") else { return };
        let mut segments = AbsolutePath::new(d);
        for seg in segments.by_ref() {
            match seg {
                AbsSegment::MoveTo(p) => w.move_to(apply(m, p)),
                AbsSegment::LineTo(p) => w.line_to(apply(m, p)),
                AbsSegment::CurveTo(c1, c2, p) => {
                    w.cubic_to(apply(m, c1), apply(m, c2), apply(m, p));
                }
                AbsSegment::SmoothCurveTo { c1, c2, to } => {
                    w.smooth_cubic_to(apply(m, c1), apply(m, c2), apply(m, to));
                }
                AbsSegment::Quadratic(c, p) => w.quad_to(apply(m, c), apply(m, p)),
                AbsSegment::Arc {
                    from,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    to,
                } => match arc_to_cubics(from, rx, ry, x_axis_rotation, large_arc, sweep, to) {
                    ArcApprox::Skip => {}
                    ArcApprox::Line(p) => w.line_to(apply(m, p)),
                    ArcApprox::Cubics(cubics) => {
                        for (c1, c2, p) in cubics {
                            w.cubic_to(apply(m, c1), apply(m, c2), apply(m, p));
                        }
                    }
                },
                AbsSegment::ClosePath => w.close(),
            }
        }
        if let Some(err) = segments.error() {
            let label = el
                .attr("id")
                .map(|id| format!("path '{id}'"))
                .unwrap_or_else(|| "path".to_string());
            self.warn(format!(
                "Malformed path data in {label} ({err}); kept the part before the error"
            ));
        }
    }
}

fn own_transform(el: &Element) -> AffineMatrix {
    el.attr("transform")
        .map(parse_transform_list)
        .unwrap_or(AffineMatrix::IDENTITY)
}

fn apply(m: AffineMatrix, p: (f64, f64)) -> (f64, f64) {
    m.apply(p.0, p.1)
}

// ── Primitive shapes ─────────────────────────────────────────────────────

fn write_rect(el: &Element, m: AffineMatrix, w: &mut PathWriter) {
    let x = num_attr(el, "x").unwrap_or(0.0);
    let y = num_attr(el, "y").unwrap_or(0.0);
    let (Some(width), Some(height)) = (num_attr(el, "width"), num_attr(el, "height")) else {
        return;
    };
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let rx = num_attr(el, "rx").filter(|v| *v > 0.0);
    let ry = num_attr(el, "ry").filter(|v| *v > 0.0);
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);

    let p = |px: f64, py: f64| m.apply(px, py);
    let (r, b) = (x + width, y + height);

    if rx == 0.0 || ry == 0.0 {
        w.move_to(p(x, y));
        w.line_to(p(r, y));
        w.line_to(p(r, b));
        w.line_to(p(x, b));
        w.close();
        return;
    }

    let (kx, ky) = (KAPPA * rx, KAPPA * ry);
    w.move_to(p(x + rx, y));
    w.line_to(p(r - rx, y));
    w.cubic_to(p(r - rx + kx, y), p(r, y + ry - ky), p(r, y + ry));
    w.line_to(p(r, b - ry));
    w.cubic_to(p(r, b - ry + ky), p(r - rx + kx, b), p(r - rx, b));
    w.line_to(p(x + rx, b));
    w.cubic_to(p(x + rx - kx, b), p(x, b - ry + ky), p(x, b - ry));
    w.line_to(p(x, y + ry));
    w.cubic_to(p(x, y + ry - ky), p(x + rx - kx, y), p(x + rx, y));
    w.close();
}

/// Circle and ellipse: four quarter cubics starting at 3 o'clock.
fn write_ellipse(el: &Element, rx: f64, ry: f64, m: AffineMatrix, w: &mut PathWriter) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let cx = num_attr(el, "cx").unwrap_or(0.0);
    let cy = num_attr(el, "cy").unwrap_or(0.0);
    let (kx, ky) = (KAPPA * rx, KAPPA * ry);
    let p = |px: f64, py: f64| m.apply(px, py);

    w.move_to(p(cx + rx, cy));
    w.cubic_to(p(cx + rx, cy + ky), p(cx + kx, cy + ry), p(cx, cy + ry));
    w.cubic_to(p(cx - kx, cy + ry), p(cx - rx, cy + ky), p(cx - rx, cy));
    w.cubic_to(p(cx - rx, cy - ky), p(cx - kx, cy - ry), p(cx, cy - ry));
    w.cubic_to(p(cx + kx, cy - ry), p(cx + rx, cy - ky), p(cx + rx, cy));
    w.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse;

    fn run(svg: &str) -> ExtractedDocument {
        let parsed = parse(svg, 1.0).unwrap();
        extract(parsed, &ImportConfig::default())
    }

    #[test]
    fn absolute_line_passes_through() {
        let doc = run(r#"<svg><path d="M0 0 L10 0"/></svg>"#);
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].d, "M0 0 L10 0");
        assert_eq!(doc.paths[0].kind, ShapeKind::Path);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn relative_and_axis_commands_are_absolutised() {
        let doc = run(r#"<svg><path d="m5 5 h10 v10 l-10 0 z"/></svg>"#);
        assert_eq!(doc.paths[0].d, "M5 5 L15 5 L15 15 L5 15 Z");
    }

    #[test]
    fn arc_under_transform_becomes_cubics() {
        let doc = run(
            r#"<svg><g transform="rotate(30) scale(2 1)"><path d="M0 0 A10 10 0 0 1 20 0"/></g></svg>"#,
        );
        let d = &doc.paths[0].d;
        assert!(!d.contains('A'), "{d}");
        assert!(d.contains('C'), "{d}");
    }

    #[test]
    fn group_transforms_compose() {
        let doc = run(
            r#"<svg><g transform="translate(100 0)"><g transform="scale(2)"><path d="M1 1 L5 1"/></g></g></svg>"#,
        );
        assert_eq!(doc.paths[0].d, "M102 2 L110 2");
    }

    #[test]
    fn use_inside_translated_group_is_offset() {
        let doc = run(
            r##"<svg><defs><path id="p" d="M0 0 L10 0"/></defs>
                <g transform="translate(5 7)"><use href="#p"/></g></svg>"##,
        );
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].d, "M5 7 L15 7");
        assert_eq!(doc.stats.resolved_uses, 1);
    }

    #[test]
    fn use_position_applies_after_its_transform() {
        let doc = run(
            r##"<svg><defs><path id="p" d="M0 0 L10 0"/></defs>
                <use xlink:href="#p" xmlns:xlink="http://www.w3.org/1999/xlink" x="1" y="2" transform="scale(2)"/></svg>"##,
        );
        assert_eq!(doc.paths[0].d, "M2 4 L22 4");
    }

    #[test]
    fn symbol_rendered_only_through_use() {
        let doc = run(
            r##"<svg><symbol id="s"><rect width="10" height="10"/></symbol><use href="#s" x="20"/></svg>"##,
        );
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].d, "M20 0 L30 0 L30 10 L20 10 Z");
    }

    #[test]
    fn mutual_references_report_cycle() {
        let doc = run(r##"<svg><use id="a" href="#b"/><use id="b" href="#a"/></svg>"##);
        assert!(doc.paths.is_empty());
        assert!(!doc.warnings.is_empty());
        assert!(doc.warnings.iter().all(|w| w.contains("cycle")), "{:?}", doc.warnings);
        assert!(doc.warnings[0].contains("b -> a -> b"), "{:?}", doc.warnings);
    }

    #[test]
    fn reused_target_is_not_a_cycle() {
        let doc = run(
            r##"<svg><defs><path id="p" d="M0 0 L10 0"/></defs>
                <use href="#p"/><use href="#p" y="20"/></svg>"##,
        );
        assert_eq!(doc.paths.len(), 2);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn unresolved_and_external_references_warn() {
        let doc = run(r##"<svg><use href="#missing"/><use href="other.svg#x"/></svg>"##);
        assert_eq!(doc.warnings.len(), 2);
        assert!(doc.warnings[0].contains("#missing"));
    }

    #[test]
    fn depth_limit_stops_chain() {
        let mut svg = String::from(r#"<svg><defs><path id="r0" d="M0 0 L10 0"/>"#);
        for i in 1..=12 {
            svg.push_str(&format!(r##"<g id="r{i}"><use href="#r{}"/></g>"##, i - 1));
        }
        svg.push_str(r##"</defs><use href="#r12"/></svg>"##);
        let doc = run(&svg);
        assert!(doc.paths.is_empty());
        assert!(doc.warnings.iter().any(|w| w.contains("depth limit")));
    }

    #[test]
    fn shapes_convert_to_paths() {
        let doc = run(
            r#"<svg>
                <rect x="1" y="2" width="10" height="5"/>
                <circle cx="10" cy="10" r="5"/>
                <ellipse cx="0" cy="0" rx="4" ry="2"/>
                <line x1="0" y1="0" x2="3" y2="4"/>
                <polyline points="0,0 10,0 10,10"/>
                <polygon points="0 0 10 0 10 10"/>
            </svg>"#,
        );
        let ds: Vec<&str> = doc.paths.iter().map(|p| p.d.as_str()).collect();
        assert_eq!(ds[0], "M1 2 L11 2 L11 7 L1 7 Z");
        assert!(ds[1].starts_with("M15 10 C15 12.761 12.761 15 10 15"), "{}", ds[1]);
        assert_eq!(ds[1].matches('C').count(), 4);
        assert!(ds[2].starts_with("M4 0 C"));
        assert_eq!(ds[3], "M0 0 L3 4");
        assert_eq!(ds[4], "M0 0 L10 0 L10 10");
        assert_eq!(ds[5], "M0 0 L10 0 L10 10 Z");
        let kinds: Vec<ShapeKind> = doc.paths.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ShapeKind::Rect,
                ShapeKind::Circle,
                ShapeKind::Ellipse,
                ShapeKind::Line,
                ShapeKind::Polyline,
                ShapeKind::Polygon
            ]
        );
    }

    #[test]
    fn rounded_rect_radius_is_clamped() {
        let doc = run(r#"<svg><rect width="10" height="4" rx="8"/></svg>"#);
        // rx clamps to 5, ry follows rx then clamps to 2
        // the zero-length top edge is suppressed
        assert!(doc.paths[0].d.starts_with("M5 0 C7.761 0 10 0.895 10 2"), "{}", doc.paths[0].d);
        assert_eq!(doc.paths[0].d.matches('C').count(), 4);
    }

    #[test]
    fn degenerate_shapes_emit_nothing() {
        let doc = run(
            r#"<svg><rect width="0" height="5"/><circle r="-1"/><polyline points="1 1"/><path/></svg>"#,
        );
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn tiny_segments_are_suppressed() {
        let doc = run(r#"<svg><path d="M0 0 L0.1 0 L10 0 L10.1 0.1"/></svg>"#);
        assert_eq!(doc.paths[0].d, "M0 0 L10 0");
    }

    #[test]
    fn malformed_path_data_is_truncated_with_warning() {
        let doc = run(r#"<svg><path id="bad" d="M0 0 L10 0 L20 oops"/></svg>"#);
        assert_eq!(doc.paths[0].d, "M0 0 L10 0");
        assert!(doc.warnings[0].contains("path 'bad'"));
    }

    #[test]
    fn smooth_cubic_kept_after_cubic() {
        let doc = run(r#"<svg><path d="M0 0 C0 5 5 10 10 10 S20 5 20 0"/></svg>"#);
        assert_eq!(doc.paths[0].d, "M0 0 C0 5 5 10 10 10 S20 5 20 0");
        let doc = run(r#"<svg><path d="M0 0 L10 0 S20 5 20 10"/></svg>"#);
        assert_eq!(doc.paths[0].d, "M0 0 L10 0 C10 0 20 5 20 10");
    }

    #[test]
    fn smooth_quadratic_becomes_quadratic() {
        let doc = run(r#"<svg><path d="M0 0 Q5 10 10 0 T20 0"/></svg>"#);
        assert_eq!(doc.paths[0].d, "M0 0 Q5 10 10 0 Q15 -10 20 0");
    }

    #[test]
    fn style_is_captured_and_inherited() {
        let doc = run(
            r#"<svg><g fill="red" stroke="blue" stroke-width="3" opacity="0.5">
                <path id="a" d="M0 0 L10 0" style="fill: green; opacity: 0.5"/>
            </g></svg>"#,
        );
        let p = &doc.paths[0];
        assert_eq!(p.id.as_deref(), Some("a"));
        assert_eq!(p.fill.as_deref(), Some("green"));
        assert_eq!(p.stroke.as_deref(), Some("blue"));
        assert_eq!(p.stroke_width, Some(3.0));
        assert_eq!(p.opacity, Some(0.25));
    }

    #[test]
    fn counts_elements_seen() {
        let doc = run(r##"<svg><defs><path id="p" d="M0 0 L9 9"/></defs><use href="#p"/></svg>"##);
        // svg, defs, use, path (through use)
        assert_eq!(doc.stats.elements_seen, 4);
    }

    #[test]
    fn pruned_nesting_is_reported_once() {
        let depth = MAX_NESTING + 5;
        let svg = format!(
            r#"<svg><path d="M0 0 L10 0"/>{}<path d="M0 0 L20 0"/>{}</svg>"#,
            "<g>".repeat(depth),
            "</g>".repeat(depth)
        );
        let doc = run(&svg);
        assert_eq!(doc.paths.len(), 1);
        let pruned: Vec<_> = doc
            .warnings
            .iter()
            .filter(|w| w.contains("nested deeper than"))
            .collect();
        assert_eq!(pruned.len(), 1);
        // Five <g> levels past the limit plus the path inside them.
        assert!(pruned[0].starts_with("Dropped 6 element(s)"), "{}", pruned[0]);
    }

    #[test]
    fn switch_draws_only_its_first_child() {
        let doc = run(
            r#"<svg><switch><path id="a" d="M0 0 L10 0"/><path id="b" d="M0 0 L20 0"/></switch></svg>"#,
        );
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].id.as_deref(), Some("a"));
    }
}
