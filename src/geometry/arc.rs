//! Elliptical arc → cubic Bézier conversion.
//!
//! Endpoint-to-center parameterisation from the SVG implementation notes:
//! rotate into the ellipse frame, scale radii up when the endpoints cannot be
//! joined, solve for the center, then split the sweep into ≤ 90° pieces. Each
//! piece becomes one cubic with control arms of length `(4/3)·tan(Δ/4)`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// One cubic segment: first control point, second control point, end point.
pub type Cubic = ((f64, f64), (f64, f64), (f64, f64));

/// Result of converting one arc command.
#[derive(Debug, Clone, PartialEq)]
pub enum ArcApprox {
    /// Endpoints coincide: the arc draws nothing.
    Skip,
    /// A radius is zero: the arc is a straight line to the end point.
    Line((f64, f64)),
    Cubics(Vec<Cubic>),
}

/// Convert the arc from `from` to `to`.
#[allow(clippy::too_many_arguments)]
pub fn arc_to_cubics(
    from: (f64, f64),
    rx: f64,
    ry: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: (f64, f64),
) -> ArcApprox {
    let (x0, y0) = from;
    let (x1, y1) = to;
    if x0 == x1 && y0 == y1 {
        return ArcApprox::Skip;
    }
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return ArcApprox::Line(to);
    }

    let (sin_phi, cos_phi) = x_axis_rotation_deg.to_radians().sin_cos();

    // Step 1: endpoint midpoint in the ellipse frame.
    let dx2 = (x0 - x1) / 2.0;
    let dy2 = (y0 - y1) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Step 2: radius correction.
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let lambda = x1p2 / (rx * rx) + y1p2 / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    // Step 3: center in the ellipse frame.
    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2;
    let den = rx2 * y1p2 + ry2 * x1p2;
    let coef = if den == 0.0 {
        0.0
    } else {
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        sign * (num / den).max(0.0).sqrt()
    };
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    // Step 4: center in user space.
    let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x1) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y1) / 2.0;

    // Step 5: start angle and signed sweep.
    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let theta1 = angle_between(1.0, 0.0, ux, uy);
    let mut dtheta = angle_between(ux, uy, vx, vy);
    if !sweep && dtheta > 0.0 {
        dtheta -= TAU;
    } else if sweep && dtheta < 0.0 {
        dtheta += TAU;
    }

    let count = (dtheta.abs() / FRAC_PI_2 - 1e-9).ceil().max(1.0) as usize;
    let delta = dtheta / count as f64;

    let ellipse = Ellipse {
        cx,
        cy,
        rx,
        ry,
        sin_phi,
        cos_phi,
    };
    let mut out = Vec::with_capacity(count);
    let mut t1 = theta1;
    for i in 0..count {
        let t2 = t1 + delta;
        let (c1, c2, mut end) = ellipse.segment(t1, t2);
        if i + 1 == count {
            // Land exactly on the requested end point.
            end = to;
        }
        out.push((c1, c2, end));
        t1 = t2;
    }
    ArcApprox::Cubics(out)
}

fn angle_between(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let det = ux * vy - uy * vx;
    let a = det.atan2(dot);
    // atan2 can return -π for antiparallel vectors; keep it in (-π, π].
    if a <= -PI {
        a + TAU
    } else {
        a
    }
}

struct Ellipse {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    sin_phi: f64,
    cos_phi: f64,
}

impl Ellipse {
    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        let x = self.rx * x;
        let y = self.ry * y;
        (
            self.cx + self.cos_phi * x - self.sin_phi * y,
            self.cy + self.sin_phi * x + self.cos_phi * y,
        )
    }

    fn segment(&self, t1: f64, t2: f64) -> Cubic {
        let k = (4.0 / 3.0) * ((t2 - t1) / 4.0).tan();
        let (s1, c1) = t1.sin_cos();
        let (s2, c2) = t2.sin_cos();
        (
            self.map(c1 - k * s1, s1 + k * c1),
            self.map(c2 + k * s2, s2 - k * c2),
            self.map(c2, s2),
        )
    }
}
