use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

/// One country shape from the world file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// Join key against the emissions table's country code.
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl GeoFeature {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }

    /// Name for tooltips: `properties.name`, else the id.
    pub fn display_name(&self) -> &str {
        match self.name() {
            Some(name) if !name.is_empty() => name,
            _ => self.id.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldFeatures {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug)]
pub enum WorldError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::Json(e) => write!(f, "JSON parse error: {e}"),
            WorldError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            WorldError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl WorldFeatures {
    pub fn from_geojson_str(payload: &str) -> Result<Self, WorldError> {
        let value: Value = serde_json::from_str(payload).map_err(WorldError::Json)?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, WorldError> {
        let obj = value.as_object().ok_or(WorldError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(WorldError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(WorldError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(WorldError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let invalid = |reason: String| WorldError::InvalidFeature { index, reason };

            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| invalid("feature must be an object".to_string()))?;

            let feat_type = feat_obj
                .get("type")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid("feature missing type".to_string()))?;
            if feat_type != "Feature" {
                return Err(invalid(format!("unexpected feature type: {feat_type}")));
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry_val = feat_obj
                .get("geometry")
                .filter(|v| !v.is_null())
                .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
            let geometry = parse_geometry(geometry_val).map_err(invalid)?;

            features.push(GeoFeature {
                id,
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_rings).collect()
}

#[cfg(test)]
mod tests {
    use super::{Geometry, WorldError, WorldFeatures};

    #[test]
    fn parses_sample_world() {
        let payload = include_str!("../../apps/viewer_web/assets/data/sample_world.geojson");
        let world = WorldFeatures::from_geojson_str(payload).expect("parse world");
        assert_eq!(world.features.len(), 4);

        let fra = &world.features[1];
        assert_eq!(fra.id.as_deref(), Some("FRA"));
        assert_eq!(fra.display_name(), "France");
        match &fra.geometry {
            Geometry::MultiPolygon(polys) => assert_eq!(polys.len(), 2),
            other => panic!("unexpected geometry: {other:?}"),
        }

        assert_eq!(world.features[3].id, None);
    }

    #[test]
    fn numeric_ids_are_stringified_and_name_falls_back_to_id() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":840,"properties":{},
             "geometry":{"type":"Point","coordinates":[-98.0,39.0]}}]}"#;
        let world = WorldFeatures::from_geojson_str(payload).expect("parse world");
        assert_eq!(world.features[0].id.as_deref(), Some("840"));
        assert_eq!(world.features[0].display_name(), "840");
    }

    #[test]
    fn rejects_non_collection_root() {
        let err = WorldFeatures::from_geojson_str(r#"{"type":"Feature"}"#).expect_err("root");
        assert!(matches!(err, WorldError::NotAFeatureCollection));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = WorldFeatures::from_geojson_str("{not json").expect_err("json");
        assert!(matches!(err, WorldError::Json(_)));
    }

    #[test]
    fn null_geometry_is_reported_with_index() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":"A","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}},
            {"type":"Feature","id":"B","properties":{},"geometry":null}]}"#;
        let err = WorldFeatures::from_geojson_str(payload).expect_err("null geometry");
        match err {
            WorldError::InvalidFeature { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
