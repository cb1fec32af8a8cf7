use compute::year_index::YearIndex;
use formats::loader::{LoadedData, load_from_strs};
use formats::normalize::{NormalizedDataset, YearSet};
use foundation::time::Time;
use layers::choropleth::ChoroplethLayer;
use layers::legend::Legend;
use layers::symbology::{ColorRamp, ColorScale};
use tracing::info;

use crate::config::ViewerConfig;
use crate::error::PipelineError;

/// Everything derived once from the two inputs. Nothing in here depends on
/// the selected year except the fill state inside `layer`.
#[derive(Debug, Clone)]
pub struct Session {
    config: ViewerConfig,
    dataset: NormalizedDataset,
    scale: ColorScale,
    legend: Legend,
    layer: ChoroplethLayer,
}

impl Session {
    pub fn build(data: LoadedData, config: &ViewerConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let style = config.choropleth_style()?;

        let dataset = NormalizedDataset::normalize(data.records, config.min_year)?;
        let scale = ColorScale::from_totals(
            dataset.finite_totals(),
            config.percentile,
            ColorRamp::reds(),
        );
        let legend = Legend::build(&scale, &config.legend_style(), config.width, config.height);
        let layer = ChoroplethLayer::new(&data.features, &config.projection(), style);
        info!(
            shapes = layer.shapes().len(),
            years = dataset.years().len(),
            "map session ready"
        );

        Ok(Self {
            config: config.clone(),
            dataset,
            scale,
            legend,
            layer,
        })
    }

    pub fn from_strs(csv: &str, geojson: &str, config: &ViewerConfig) -> Result<Self, PipelineError> {
        let data = load_from_strs(csv, geojson)?;
        Self::build(data, config)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn dataset(&self) -> &NormalizedDataset {
        &self.dataset
    }

    pub fn years(&self) -> &YearSet {
        self.dataset.years()
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn layer(&self) -> &ChoroplethLayer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut ChoroplethLayer {
        &mut self.layer
    }

    /// Retargets every shape's fill for `index` under the session scale.
    pub fn restyle(&mut self, index: &YearIndex, now: Time) {
        self.layer.restyle(index, &self.scale, now);
    }
}
