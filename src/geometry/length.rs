//! Path length estimation and command counting.

use super::arc::{arc_to_cubics, ArcApprox};
use super::path::{AbsSegment, AbsolutePath};
use super::writer::distance;

type Point = (f64, f64);

const CURVE_STEPS: usize = 10;

/// Estimated length of path data.
///
/// Lines are exact. Cubic and quadratic curves are sampled at 10 uniform
/// parameter steps and the chords summed, which slightly under-estimates.
/// `Z` adds the straight distance back to the subpath start. Malformed data
/// contributes whatever was parsed before the error.
pub fn estimate_length(d: &str) -> f64 {
    let mut segments = AbsolutePath::new(d);
    let mut total = 0.0;
    let mut current = (0.0, 0.0);
    let mut start = (0.0, 0.0);

    while let Some(seg) = segments.next() {
        match seg {
            AbsSegment::MoveTo(p) => {
                start = p;
            }
            AbsSegment::LineTo(p) => {
                total += distance(current, p);
            }
            AbsSegment::CurveTo(c1, c2, p) | AbsSegment::SmoothCurveTo { c1, c2, to: p } => {
                total += cubic_length(current, c1, c2, p);
            }
            AbsSegment::Quadratic(c, p) => {
                total += quad_length(current, c, p);
            }
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
                ArcApprox::Line(p) => total += distance(from, p),
                ArcApprox::Cubics(cubics) => {
                    let mut p0 = from;
                    for (c1, c2, p) in cubics {
                        total += cubic_length(p0, c1, c2, p);
                        p0 = p;
                    }
                }
            },
            AbsSegment::ClosePath => {
                total += distance(current, start);
            }
        }
        current = segments.current();
    }
    total
}

/// Number of command letters in path data (`e`/`E` exponents excluded).
pub fn count_commands(d: &str) -> usize {
    d.bytes()
        .filter(|b| b.is_ascii_alphabetic() && *b != b'e' && *b != b'E')
        .count()
}

fn cubic_length(p0: Point, c1: Point, c2: Point, p3: Point) -> f64 {
    sampled_length(|t| {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        (
            a * p0.0 + b * c1.0 + c * c2.0 + d * p3.0,
            a * p0.1 + b * c1.1 + c * c2.1 + d * p3.1,
        )
    })
}

fn quad_length(p0: Point, c: Point, p2: Point) -> f64 {
    sampled_length(|t| {
        let mt = 1.0 - t;
        let a = mt * mt;
        let b = 2.0 * mt * t;
        let d = t * t;
        (
            a * p0.0 + b * c.0 + d * p2.0,
            a * p0.1 + b * c.1 + d * p2.1,
        )
    })
}

fn sampled_length(at: impl Fn(f64) -> Point) -> f64 {
    let mut prev = at(0.0);
    let mut total = 0.0;
    for i in 1..=CURVE_STEPS {
        let p = at(i as f64 / CURVE_STEPS as f64);
        total += distance(prev, p);
        prev = p;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_exact() {
        assert_eq!(estimate_length("M0 0 L3 4 L3 10"), 11.0);
    }

    #[test]
    fn close_returns_to_subpath_start() {
        assert_eq!(estimate_length("M0 0 L10 0 L10 10 L0 10 Z"), 40.0);
        assert_eq!(estimate_length("M0 0 L1 0 L1 1 L0 1 Z"), 4.0);
    }

    #[test]
    fn straight_cubic_matches_chord() {
        let len = estimate_length("M0 0 C10 0 20 0 30 0");
        assert!((len - 30.0).abs() < 1e-9);
    }

    #[test]
    fn quarter_circle_is_slight_underestimate() {
        let k = 100.0 * 0.5522847498;
        let d = format!("M100 0 C100 {k} {k} 100 0 100");
        let len = estimate_length(&d);
        let exact = std::f64::consts::FRAC_PI_2 * 100.0;
        assert!(len < exact && len > exact * 0.99, "{len} vs {exact}");
    }

    #[test]
    fn smooth_cubic_without_prior_cubic_starts_at_current_point() {
        // c1 collapses onto (0,0) and c2 lies on the chord: a straight line.
        let len = estimate_length("M0 0 S5 0 10 0");
        assert!((len - 10.0).abs() < 1e-9);
    }

    #[test]
    fn counts_command_letters_only() {
        assert_eq!(count_commands("M0 0 L10 0 C1 2 3 4 5 6 Z"), 4);
        assert_eq!(count_commands("M1e2 0 L2E-1 0"), 2);
    }
}
