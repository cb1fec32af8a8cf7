use compute::analysis::Statistics;
use tracing::{info, warn};

/// 8-bit sRGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Straight per-channel RGB interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| channel(a as f64 + (b as f64 - a as f64) * t);
        Color::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// ColorBrewer sequential "Reds", 9 classes, light to dark.
pub const REDS: [Color; 9] = [
    Color::rgb(0xff, 0xf5, 0xf0),
    Color::rgb(0xfe, 0xe0, 0xd2),
    Color::rgb(0xfc, 0xbb, 0xa1),
    Color::rgb(0xfc, 0x92, 0x72),
    Color::rgb(0xfb, 0x6a, 0x4a),
    Color::rgb(0xef, 0x3b, 0x2c),
    Color::rgb(0xcb, 0x18, 0x1d),
    Color::rgb(0xa5, 0x0f, 0x15),
    Color::rgb(0x67, 0x00, 0x0d),
];

/// Continuous ramp through a list of colors, smoothed with a uniform cubic
/// B-spline per channel. Passes exactly through the first and last color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Color>,
}

impl ColorRamp {
    pub fn new(stops: Vec<Color>) -> Self {
        Self { stops }
    }

    pub fn reds() -> Self {
        Self::new(REDS.to_vec())
    }

    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    pub fn sample(&self, t: f64) -> Color {
        match self.stops.as_slice() {
            [] => Color::rgb(0, 0, 0),
            [only] => *only,
            stops => {
                let pick = |f: fn(&Color) -> u8| {
                    let values: Vec<f64> = stops.iter().map(|c| f(c) as f64).collect();
                    channel(basis_spline(&values, t))
                };
                Color::rgb(pick(|c| c.r), pick(|c| c.g), pick(|c| c.b))
            }
        }
    }
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

/// `values.len() >= 2`.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let nf = n as f64;
    let (t, i) = if !(t > 0.0) {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, (t * nf).floor() as usize)
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    basis((t - i as f64 / nf) * nf, v0, v1, v2, v3)
}

/// Sequential value → color mapping over `[0, upper]`, clamped at both ends.
///
/// Built once per session from every retained total so that a color means
/// the same magnitude in every year.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    upper: f64,
    ramp: ColorRamp,
}

impl ColorScale {
    pub fn new(upper: f64, ramp: ColorRamp) -> Self {
        Self { upper, ramp }
    }

    /// Domain upper bound = `percentile` of the finite `totals`.
    pub fn from_totals(
        totals: impl IntoIterator<Item = f64>,
        percentile: f64,
        ramp: ColorRamp,
    ) -> Self {
        let sorted = Statistics::sorted_finite(totals);
        let upper = match Statistics::quantile_sorted(&sorted, percentile) {
            Some(q) => {
                info!(
                    "{:.0}th percentile per-capita CO2: {q}",
                    percentile * 100.0
                );
                q
            }
            None => {
                warn!("no finite totals; color scale domain collapses to [0, 0]");
                0.0
            }
        };
        Self::new(upper, ramp)
    }

    pub fn lower(&self) -> f64 {
        0.0
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    /// Ramp position in `[0, 1]`. A collapsed domain maps everything to the
    /// middle of the ramp; NaN maps to the lower end.
    pub fn position(&self, value: f64) -> f64 {
        let span = self.upper - self.lower();
        if span == 0.0 || !span.is_finite() {
            return 0.5;
        }
        let t = (value - self.lower()) / span;
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }

    pub fn color_of(&self, value: f64) -> Color {
        self.ramp.sample(self.position(value))
    }
}
