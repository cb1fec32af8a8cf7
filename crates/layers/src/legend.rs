use compute::analysis::Statistics;
use foundation::math::Vec2;

use crate::symbology::{Color, ColorScale};

pub const LEGEND_TITLE: &str = "Per-capita CO₂ emissions (t / person)";

/// Legend bar geometry. The bar is centered horizontally and its top edge sits
/// `bottom_offset` px above the bottom of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub width: f64,
    pub height: f64,
    pub bottom_offset: f64,
    pub gradient_stops: usize,
    pub axis_ticks: usize,
    pub title: String,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 20.0,
            bottom_offset: 40.0,
            gradient_stops: 10,
            axis_ticks: 5,
            title: LEGEND_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    /// Position along the bar in `[0, 1]`.
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    /// `offset` as an SVG percentage, e.g. `"30%"`.
    pub fn offset_percent(&self) -> String {
        let pct = (self.offset * 100.0 * 1e6).round() / 1e6;
        format!("{pct}%")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    /// Distance from the left edge of the bar, px.
    pub x: f64,
    pub label: String,
}

/// Static description of the color legend; computed once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub origin: Vec2,
    pub width: f64,
    pub height: f64,
    pub stops: Vec<GradientStop>,
    pub ticks: Vec<AxisTick>,
    pub title: String,
}

impl Legend {
    pub fn build(scale: &ColorScale, style: &LegendStyle, viewport_w: f64, viewport_h: f64) -> Self {
        let upper = scale.upper();

        let stops = Statistics::ticks(0.0, 1.0, style.gradient_stops)
            .into_iter()
            .map(|offset| GradientStop {
                offset,
                color: scale.color_of(offset * upper),
            })
            .collect();

        let step = Statistics::tick_step(0.0, upper, style.axis_ticks);
        let ticks = Statistics::ticks(0.0, upper, style.axis_ticks)
            .into_iter()
            .map(|value| AxisTick {
                value,
                x: axis_x(value, upper, style.width),
                label: format_tick(value, step),
            })
            .collect();

        Self {
            origin: Vec2::new((viewport_w - style.width) / 2.0, viewport_h - style.bottom_offset),
            width: style.width,
            height: style.height,
            stops,
            ticks,
            title: style.title.clone(),
        }
    }
}

fn axis_x(value: f64, upper: f64, width: f64) -> f64 {
    if upper == 0.0 || !upper.is_finite() {
        return width / 2.0;
    }
    value / upper * width
}

/// Fixed-point label with just enough decimals to tell ticks `step` apart,
/// thousands grouped with commas.
pub fn format_tick(value: f64, step: f64) -> String {
    let step = step.abs();
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let digits = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::new();
    let is_zero = digits.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.push('−');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
