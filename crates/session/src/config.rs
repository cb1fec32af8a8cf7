use foundation::math::NaturalEarth1;
use layers::choropleth::ChoroplethStyle;
use layers::legend::{LEGEND_TITLE, LegendStyle};
use layers::symbology::Color;
use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidColor { field: &'static str, value: String },
    InvalidValue { field: &'static str, reason: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid viewer config: {e}"),
            ConfigError::InvalidColor { field, value } => {
                write!(f, "config field {field}: '{value}' is not a #rrggbb color")
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "config field {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub width: f64,
    pub height: f64,
    pub bottom_offset: f64,
    pub title: String,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 20.0,
            bottom_offset: 40.0,
            title: LEGEND_TITLE.to_string(),
        }
    }
}

/// Viewer settings. Every field is optional in JSON; missing ones take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: f64,
    pub height: f64,
    pub projection_scale: f64,
    pub world_url: String,
    pub emissions_url: String,
    pub min_year: i32,
    pub percentile: f64,
    pub transition_ms: f64,
    pub no_data_color: String,
    pub stroke_color: String,
    /// Tooltip distance from the pointer on both axes, px.
    pub tooltip_offset: f64,
    pub legend: LegendConfig,
    /// `tracing` filter directive, e.g. `"info"` or `"session=debug"`.
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 650.0,
            projection_scale: 160.0,
            world_url: "data/world.geojson".to_string(),
            emissions_url: "data/GCB2022v27_percapita_flat.csv".to_string(),
            min_year: formats::normalize::DEFAULT_MIN_YEAR,
            percentile: 0.99,
            transition_ms: 500.0,
            no_data_color: "#eeeeee".to_string(),
            stroke_color: "#999999".to_string(),
            tooltip_offset: 10.0,
            legend: LegendConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_color("no_data_color", &self.no_data_color)?;
        parse_color("stroke_color", &self.stroke_color)?;
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "width/height",
                reason: "viewport must have a positive size",
            });
        }
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(ConfigError::InvalidValue {
                field: "percentile",
                reason: "must be within [0, 1]",
            });
        }
        if !(self.transition_ms >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "transition_ms",
                reason: "must be zero or positive",
            });
        }
        Ok(())
    }

    pub fn projection(&self) -> NaturalEarth1 {
        NaturalEarth1::centered(self.width, self.height, self.projection_scale)
    }

    pub fn choropleth_style(&self) -> Result<ChoroplethStyle, ConfigError> {
        Ok(ChoroplethStyle {
            stroke: parse_color("stroke_color", &self.stroke_color)?,
            no_data: parse_color("no_data_color", &self.no_data_color)?,
            transition_s: self.transition_ms / 1000.0,
        })
    }

    pub fn legend_style(&self) -> LegendStyle {
        LegendStyle {
            width: self.legend.width,
            height: self.legend.height,
            bottom_offset: self.legend.bottom_offset,
            title: self.legend.title.clone(),
            ..LegendStyle::default()
        }
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_hex(value).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewerConfig};
    use layers::symbology::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ViewerConfig::from_json_str("{}").expect("config");
        assert_eq!(config, ViewerConfig::default());
        let style = config.choropleth_style().expect("style");
        assert_eq!(style.no_data, Color::rgb(0xee, 0xee, 0xee));
        assert_eq!(style.transition_s, 0.5);
        assert_eq!(config.legend_style().width, 300.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "min_year": 1950, "legend": { "title": "CO2" }, "world_url": "w.json" }"#,
        )
        .expect("config");
        assert_eq!(config.min_year, 1950);
        assert_eq!(config.world_url, "w.json");
        assert_eq!(config.legend.title, "CO2");
        assert_eq!(config.legend.width, 300.0);
        assert_eq!(config.percentile, 0.99);
    }

    #[test]
    fn rejects_bad_colors_and_ranges() {
        let err = ViewerConfig::from_json_str(r#"{ "stroke_color": "grey" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { field: "stroke_color", .. }));

        let err = ViewerConfig::from_json_str(r#"{ "percentile": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "percentile", .. }));

        let err = ViewerConfig::from_json_str(r#"{ "width": "wide" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
