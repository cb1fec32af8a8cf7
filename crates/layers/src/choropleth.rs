use compute::year_index::YearIndex;
use formats::world::GeoFeature;
use foundation::ids::ShapeId;
use foundation::math::NaturalEarth1;
use foundation::time::Time;
use tracing::debug;

use crate::path::svg_path;
use crate::symbology::{Color, ColorScale};
use crate::transition::FillState;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChoroplethStyle {
    pub stroke: Color,
    pub no_data: Color,
    pub transition_s: f64,
}

impl Default for ChoroplethStyle {
    fn default() -> Self {
        Self {
            stroke: Color::rgb(0x99, 0x99, 0x99),
            no_data: Color::rgb(0xee, 0xee, 0xee),
            transition_s: 0.5,
        }
    }
}

/// A feature projected once into screen space. Never modified after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub id: ShapeId,
    /// Feature id; shapes without one can never match data.
    pub code: Option<String>,
    pub name: String,
    pub path: String,
}

/// Country shapes plus their per-shape fill animation state.
#[derive(Debug, Clone)]
pub struct ChoroplethLayer {
    style: ChoroplethStyle,
    shapes: Vec<CountryShape>,
    fills: Vec<FillState>,
    /// Set by `restyle`, cleared by `frame`.
    repaint_pending: bool,
}

impl ChoroplethLayer {
    pub fn new(features: &[GeoFeature], projection: &NaturalEarth1, style: ChoroplethStyle) -> Self {
        let shapes: Vec<CountryShape> = features
            .iter()
            .enumerate()
            .map(|(i, feature)| CountryShape {
                id: ShapeId::new(i as u32),
                code: feature.id.clone(),
                name: feature.display_name().to_string(),
                path: svg_path(&feature.geometry, projection),
            })
            .collect();
        debug!(shapes = shapes.len(), "projected country shapes");

        let fills = vec![FillState::default(); shapes.len()];
        Self {
            style,
            shapes,
            fills,
            repaint_pending: false,
        }
    }

    pub fn style(&self) -> &ChoroplethStyle {
        &self.style
    }

    pub fn shapes(&self) -> &[CountryShape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&CountryShape> {
        self.shapes.get(id.index())
    }

    /// Value shown for a shape under `index`, if any.
    pub fn value_of(&self, id: ShapeId, index: &YearIndex) -> Option<f64> {
        let code = self.shape(id)?.code.as_deref()?;
        index.get(code)
    }

    pub fn target_color(&self, value: Option<f64>, scale: &ColorScale) -> Color {
        match value {
            Some(v) if !v.is_nan() => scale.color_of(v),
            _ => self.style.no_data,
        }
    }

    /// Point every shape at its color for `index`, animating from what is on
    /// screen at `now`.
    pub fn restyle(&mut self, index: &YearIndex, scale: &ColorScale, now: Time) {
        let duration_s = self.style.transition_s;
        for shape in &self.shapes {
            let value = shape.code.as_deref().and_then(|code| index.get(code));
            let target = self.target_color(value, scale);
            self.fills[shape.id.index()].retarget(target, now, duration_s);
        }
        self.repaint_pending = true;
    }

    pub fn target_fill(&self, id: ShapeId) -> Option<Color> {
        self.fills.get(id.index())?.target()
    }

    pub fn displayed_fill(&self, id: ShapeId, now: Time) -> Option<Color> {
        self.fills.get(id.index())?.displayed(now)
    }

    /// Colors to put on screen at `now` for every painted shape. Finished
    /// transitions are folded away as a side effect.
    pub fn frame(&mut self, now: Time) -> Vec<(ShapeId, Color)> {
        self.repaint_pending = false;
        self.shapes
            .iter()
            .zip(self.fills.iter_mut())
            .filter_map(|(shape, fill)| fill.settle(now).map(|c| (shape.id, c)))
            .collect()
    }

    pub fn is_animating(&self, now: Time) -> bool {
        self.fills.iter().any(|f| f.is_animating(now))
    }

    /// True while the page is behind the layer: a restyle has not been drawn
    /// yet, or a transition is still running. A zero-length transition is
    /// already finished when it starts and only the pending flag covers it.
    pub fn needs_repaint(&self, now: Time) -> bool {
        self.repaint_pending || self.is_animating(now)
    }
}
