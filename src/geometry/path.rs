//! Absolute-coordinate view over SVG path data.
//!
//! Wraps [`svgtypes::PathParser`] and resolves everything that depends on the
//! current point: relative coordinates, `H`/`V` (the missing axis comes from
//! the current point), the reflected control point of `S` and `T`, and the
//! subpath start that `Z` returns to. Arcs are passed through with absolute
//! endpoints; callers decide how to approximate them.

use svgtypes::{PathParser, PathSegment};

type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbsSegment {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    /// `c1` is already the reflection of the previous cubic's second control.
    SmoothCurveTo { c1: Point, c2: Point, to: Point },
    /// `T` arrives here with its reflected control point filled in.
    Quadratic(Point, Point),
    Arc {
        from: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    ClosePath,
}

/// Iterator of [`AbsSegment`]s. Stops at the first malformed segment; the
/// parse error is then available from [`AbsolutePath::error`].
pub struct AbsolutePath<'a> {
    parser: PathParser<'a>,
    current: Point,
    start: Point,
    last_cubic_c2: Option<Point>,
    last_quad_c: Option<Point>,
    error: Option<String>,
}

impl<'a> AbsolutePath<'a> {
    pub fn new(d: &'a str) -> Self {
        Self {
            parser: PathParser::from(d),
            current: (0.0, 0.0),
            start: (0.0, 0.0),
            last_cubic_c2: None,
            last_quad_c: None,
            error: None,
        }
    }

    /// Current point after the last yielded segment.
    pub fn current(&self) -> Point {
        self.current
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            (x, y)
        } else {
            (self.current.0 + x, self.current.1 + y)
        }
    }
}

impl Iterator for AbsolutePath<'_> {
    type Item = AbsSegment;

    fn next(&mut self) -> Option<AbsSegment> {
        if self.error.is_some() {
            return None;
        }
        let seg = match self.parser.next()? {
            Ok(seg) => seg,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        let out = match seg {
            PathSegment::MoveTo { abs, x, y } => {
                let p = self.resolve(abs, x, y);
                self.start = p;
                self.current = p;
                self.last_cubic_c2 = None;
                self.last_quad_c = None;
                AbsSegment::MoveTo(p)
            }
            PathSegment::LineTo { abs, x, y } => {
                let p = self.resolve(abs, x, y);
                self.line(p)
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { self.current.0 + x };
                self.line((x, self.current.1))
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = if abs { y } else { self.current.1 + y };
                self.line((self.current.0, y))
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let c1 = self.resolve(abs, x1, y1);
                let c2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.current = to;
                self.last_cubic_c2 = Some(c2);
                self.last_quad_c = None;
                AbsSegment::CurveTo(c1, c2, to)
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c1 = reflect(self.current, self.last_cubic_c2);
                let c2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.current = to;
                self.last_cubic_c2 = Some(c2);
                self.last_quad_c = None;
                AbsSegment::SmoothCurveTo { c1, c2, to }
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let c = self.resolve(abs, x1, y1);
                let to = self.resolve(abs, x, y);
                self.quad(c, to)
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let c = reflect(self.current, self.last_quad_c);
                let to = self.resolve(abs, x, y);
                self.quad(c, to)
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let from = self.current;
                let to = self.resolve(abs, x, y);
                self.current = to;
                self.last_cubic_c2 = None;
                self.last_quad_c = None;
                AbsSegment::Arc {
                    from,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    to,
                }
            }
            PathSegment::ClosePath { .. } => {
                self.current = self.start;
                self.last_cubic_c2 = None;
                self.last_quad_c = None;
                AbsSegment::ClosePath
            }
        };
        Some(out)
    }
}

impl AbsolutePath<'_> {
    fn line(&mut self, p: Point) -> AbsSegment {
        self.current = p;
        self.last_cubic_c2 = None;
        self.last_quad_c = None;
        AbsSegment::LineTo(p)
    }

    fn quad(&mut self, c: Point, to: Point) -> AbsSegment {
        self.current = to;
        self.last_cubic_c2 = None;
        self.last_quad_c = Some(c);
        AbsSegment::Quadratic(c, to)
    }
}

/// Reflect `control` about `current`, or `current` itself without a control.
fn reflect(current: Point, control: Option<Point>) -> Point {
    match control {
        Some((cx, cy)) => (2.0 * current.0 - cx, 2.0 * current.1 - cy),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(d: &str) -> Vec<AbsSegment> {
        AbsolutePath::new(d).collect()
    }

    #[test]
    fn relative_and_axis_lines_become_absolute() {
        assert_eq!(
            segs("m10 10 l5 0 v5 H0 z"),
            vec![
                AbsSegment::MoveTo((10.0, 10.0)),
                AbsSegment::LineTo((15.0, 10.0)),
                AbsSegment::LineTo((15.0, 15.0)),
                AbsSegment::LineTo((0.0, 15.0)),
                AbsSegment::ClosePath,
            ]
        );
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let s = segs("M0 0 C0 5 5 10 10 10 S20 5 20 0");
        assert_eq!(
            s[2],
            AbsSegment::SmoothCurveTo {
                c1: (15.0, 10.0),
                c2: (20.0, 5.0),
                to: (20.0, 0.0)
            }
        );
    }

    #[test]
    fn smooth_cubic_without_previous_cubic_uses_current_point() {
        let s = segs("M0 0 L10 0 S20 5 20 10");
        assert_eq!(
            s[2],
            AbsSegment::SmoothCurveTo {
                c1: (10.0, 0.0),
                c2: (20.0, 5.0),
                to: (20.0, 10.0)
            }
        );
    }

    #[test]
    fn smooth_quadratic_reflects() {
        let s = segs("M0 0 Q5 10 10 0 T20 0");
        assert_eq!(s[2], AbsSegment::Quadratic((15.0, -10.0), (20.0, 0.0)));
    }

    #[test]
    fn malformed_data_stops_with_error() {
        let mut it = AbsolutePath::new("M0 0 L10 0 L5 x");
        let got: Vec<_> = it.by_ref().collect();
        assert_eq!(got.len(), 2);
        assert!(it.error().is_some());
    }
}
