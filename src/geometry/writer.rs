//! Canonical path-data writer.
//!
//! Every coordinate is rounded to 3 decimals before it is written, and every
//! drawn vertex closer than `skip_tiny` to the previously written point is
//! dropped. Moves are never dropped: each one starts a subpath that a later
//! `Z` closes to. A move directly after another move replaces it. The output
//! only ever contains
//! absolute `M L C S Q Z` commands, separated by single spaces:
//!
//! ```text
//! M0 0 L10 0 C10 5 5 10 0 10 Z
//! ```

use std::fmt::Write as _;

type Point = (f64, f64);

#[derive(Debug)]
pub struct PathWriter {
    d: String,
    skip_tiny: f64,
    last: Option<Point>,
    subpath_start: Option<Point>,
    /// Second control point of the last written `C`/`S`, for `S` reflection.
    last_cubic_c2: Option<Point>,
    last_command: Option<char>,
    /// Byte offset in `d` where the last written command starts.
    last_command_at: usize,
}

impl PathWriter {
    pub fn new(skip_tiny: f64) -> Self {
        Self {
            d: String::new(),
            skip_tiny,
            last: None,
            subpath_start: None,
            last_cubic_c2: None,
            last_command: None,
            last_command_at: 0,
        }
    }

    pub fn move_to(&mut self, p: Point) {
        let Some(p) = round_point(p) else { return };
        if self.last_command == Some('M') {
            self.d.truncate(self.last_command_at);
            self.d.truncate(self.d.trim_end().len());
        }
        self.push('M', &[p]);
        self.last = Some(p);
        self.subpath_start = Some(p);
        self.last_cubic_c2 = None;
    }

    pub fn line_to(&mut self, p: Point) {
        let Some(p) = round_point(p) else { return };
        if !self.ensure_started() || self.is_tiny(p) {
            return;
        }
        self.push('L', &[p]);
        self.last = Some(p);
        self.last_cubic_c2 = None;
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        let (Some(c1), Some(c2), Some(p)) = (round_point(c1), round_point(c2), round_point(p))
        else {
            return;
        };
        if !self.ensure_started() || self.is_tiny(p) {
            return;
        }
        self.push('C', &[c1, c2, p]);
        self.last = Some(p);
        self.last_cubic_c2 = Some(c2);
    }

    /// Smooth cubic whose reflected first control point is already known.
    ///
    /// Written as `S` only when the previous written command is a cubic whose
    /// reflection reproduces `c1`; otherwise (no cubic before it, or the
    /// previous curve was dropped) the explicit `C` form is written.
    pub fn smooth_cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        let (Some(c1), Some(c2), Some(p)) = (round_point(c1), round_point(c2), round_point(p))
        else {
            return;
        };
        if !self.ensure_started() || self.is_tiny(p) {
            return;
        }
        let reflects = match (self.last, self.last_cubic_c2) {
            (Some(cur), Some(prev)) => {
                (2.0 * cur.0 - prev.0 - c1.0).abs() < 1e-6
                    && (2.0 * cur.1 - prev.1 - c1.1).abs() < 1e-6
            }
            _ => false,
        };
        if reflects {
            self.push('S', &[c2, p]);
        } else {
            self.push('C', &[c1, c2, p]);
        }
        self.last = Some(p);
        self.last_cubic_c2 = Some(c2);
    }

    pub fn quad_to(&mut self, c: Point, p: Point) {
        let (Some(c), Some(p)) = (round_point(c), round_point(p)) else {
            return;
        };
        if !self.ensure_started() || self.is_tiny(p) {
            return;
        }
        self.push('Q', &[c, p]);
        self.last = Some(p);
        self.last_cubic_c2 = None;
    }

    pub fn close(&mut self) {
        if self.last.is_none() || matches!(self.last_command, Some('Z') | Some('M')) {
            return;
        }
        self.push('Z', &[]);
        self.last = self.subpath_start;
        self.last_cubic_c2 = None;
    }

    /// The path data, or `None` when nothing was written.
    pub fn finish(self) -> Option<String> {
        if self.d.is_empty() {
            None
        } else {
            Some(self.d)
        }
    }

    fn ensure_started(&self) -> bool {
        self.last.is_some()
    }

    fn is_tiny(&self, p: Point) -> bool {
        match self.last {
            Some(last) => distance(last, p) < self.skip_tiny,
            None => false,
        }
    }

    fn push(&mut self, cmd: char, points: &[Point]) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.last_command_at = self.d.len();
        self.d.push(cmd);
        for (i, (x, y)) in points.iter().enumerate() {
            if i > 0 {
                self.d.push(' ');
            }
            let _ = write!(self.d, "{x} {y}");
        }
        self.last_command = Some(cmd);
    }
}

/// Round to 3 decimals; `-0` becomes `0`.
pub fn round3(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

fn round_point(p: Point) -> Option<Point> {
    if p.0.is_finite() && p.1.is_finite() {
        Some((round3(p.0), round3(p.1)))
    } else {
        None
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_canonical_form() {
        let mut w = PathWriter::new(0.25);
        w.move_to((0.0, 0.0));
        w.line_to((10.0, 0.0));
        w.cubic_to((10.0, 5.0), (5.0, 10.0), (0.0, 10.0));
        w.close();
        assert_eq!(w.finish().unwrap(), "M0 0 L10 0 C10 5 5 10 0 10 Z");
    }

    #[test]
    fn rounds_to_three_decimals() {
        let mut w = PathWriter::new(0.0);
        w.move_to((1.23456, -0.0001));
        w.line_to((37.795275, 2.0));
        assert_eq!(w.finish().unwrap(), "M1.235 0 L37.795 2");
    }

    #[test]
    fn drops_tiny_segments_but_never_first_move() {
        let mut w = PathWriter::new(1.0);
        w.move_to((0.0, 0.0));
        w.line_to((0.5, 0.0));
        w.line_to((5.0, 0.0));
        w.cubic_to((5.0, 0.1), (5.1, 0.1), (5.2, 0.2));
        assert_eq!(w.finish().unwrap(), "M0 0 L5 0");
    }

    #[test]
    fn close_after_nearby_move_returns_to_that_move() {
        let mut w = PathWriter::new(0.25);
        w.move_to((0.0, 0.0));
        w.line_to((10.0, 0.0));
        w.line_to((10.0, 10.0));
        w.move_to((10.0, 10.1));
        w.line_to((30.0, 30.0));
        w.close();
        // A close to (10, 10.1) leaves the pen there, so this is tiny.
        w.line_to((10.0, 10.2));
        w.line_to((40.0, 40.0));
        assert_eq!(
            w.finish().unwrap(),
            "M0 0 L10 0 L10 10 M10 10.1 L30 30 Z L40 40"
        );
    }

    #[test]
    fn consecutive_moves_keep_only_the_last() {
        let mut w = PathWriter::new(0.0);
        w.move_to((0.0, 0.0));
        w.move_to((5.0, 5.0));
        w.line_to((10.0, 5.0));
        w.move_to((20.0, 0.0));
        w.move_to((20.1, 0.0));
        w.line_to((30.0, 0.0));
        assert_eq!(w.finish().unwrap(), "M5 5 L10 5 M20.1 0 L30 0");
    }

    #[test]
    fn smooth_cubic_kept_when_reflection_matches() {
        let mut w = PathWriter::new(0.0);
        w.move_to((0.0, 0.0));
        w.cubic_to((0.0, 5.0), (5.0, 10.0), (10.0, 10.0));
        w.smooth_cubic_to((15.0, 10.0), (20.0, 5.0), (20.0, 0.0));
        assert_eq!(w.finish().unwrap(), "M0 0 C0 5 5 10 10 10 S20 5 20 0");
    }

    #[test]
    fn smooth_cubic_expanded_after_dropped_curve() {
        let mut w = PathWriter::new(1.0);
        w.move_to((0.0, 0.0));
        w.cubic_to((0.1, 0.1), (0.2, 0.2), (0.3, 0.3));
        w.smooth_cubic_to((0.4, 0.4), (5.0, 5.0), (10.0, 10.0));
        assert_eq!(w.finish().unwrap(), "M0 0 C0.4 0.4 5 5 10 10");
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let mut w = PathWriter::new(0.0);
        w.move_to((0.0, 0.0));
        w.line_to((f64::INFINITY, 0.0));
        w.line_to((1.0, 1.0));
        assert_eq!(w.finish().unwrap(), "M0 0 L1 1");
    }

    #[test]
    fn empty_writer_finishes_none() {
        let mut w = PathWriter::new(0.0);
        w.close();
        w.line_to((1.0, 1.0));
        assert!(w.finish().is_none());
    }
}
