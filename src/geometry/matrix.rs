//! 2D affine transforms and the `transform="…"` attribute grammar.

/// `[x', y'] = [a·x + c·y + e, b·x + d·y + f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn rotate(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Rotation about `(cx, cy)`: translate · rotate · translate⁻¹.
    pub fn rotate_about(deg: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .mul(Self::rotate(deg))
            .mul(Self::translate(-cx, -cy))
    }

    pub fn skew_x(deg: f64) -> Self {
        Self::new(1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(deg: f64) -> Self {
        Self::new(1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// `self · other`: `other` is applied first, then `self`.
    pub fn mul(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

/// Parse a transform list, composing atomic transforms left to right.
///
/// Unknown functions and functions with the wrong argument count are skipped;
/// a truncated list keeps what was parsed before the damage.
pub fn parse_transform_list(input: &str) -> AffineMatrix {
    let mut out = AffineMatrix::IDENTITY;
    let mut s = input.trim();

    while !s.is_empty() {
        let Some(open) = s.find('(') else { break };
        let name = s[..open].trim_matches(|c: char| c.is_whitespace() || c == ',');
        let Some(close) = s[open + 1..].find(')') else {
            break;
        };
        let args = parse_number_list(&s[open + 1..open + 1 + close]);

        let m = match (name, args.as_slice()) {
            ("translate", [tx]) => Some(AffineMatrix::translate(*tx, 0.0)),
            ("translate", [tx, ty]) => Some(AffineMatrix::translate(*tx, *ty)),
            ("scale", [s]) => Some(AffineMatrix::scale(*s, *s)),
            ("scale", [sx, sy]) => Some(AffineMatrix::scale(*sx, *sy)),
            ("rotate", [a]) => Some(AffineMatrix::rotate(*a)),
            ("rotate", [a, cx, cy]) => Some(AffineMatrix::rotate_about(*a, *cx, *cy)),
            ("skewX", [a]) => Some(AffineMatrix::skew_x(*a)),
            ("skewY", [a]) => Some(AffineMatrix::skew_y(*a)),
            ("matrix", [a, b, c, d, e, f]) => Some(AffineMatrix::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        };
        if let Some(m) = m {
            out = out.mul(m);
        }

        s = s[open + 1 + close + 1..].trim_start();
    }

    out
}

/// Whitespace/comma separated numbers; anything unparsable is skipped.
pub fn parse_number_list(input: &str) -> Vec<f64> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}
