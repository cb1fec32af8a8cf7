use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::emissions::{EmissionRecord, EmissionTable, TableError};
use crate::world::{GeoFeature, WorldError, WorldFeatures};

/// Which of the two inputs a failure belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataSource {
    Tabular,
    Geographic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Tabular => write!(f, "emissions table"),
            DataSource::Geographic => write!(f, "world geometry"),
        }
    }
}

#[derive(Debug)]
pub enum DataLoadError {
    /// Transport failure reported by the host (HTTP status, network error).
    Fetch {
        source: DataSource,
        message: String,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Tabular(TableError),
    Geographic(WorldError),
}

impl std::fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataLoadError::Fetch { source, message } => {
                write!(f, "failed to fetch {source}: {message}")
            }
            DataLoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            DataLoadError::Tabular(e) => write!(f, "failed to parse emissions table: {e}"),
            DataLoadError::Geographic(e) => write!(f, "failed to parse world geometry: {e}"),
        }
    }
}

impl std::error::Error for DataLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataLoadError::Fetch { .. } => None,
            DataLoadError::Io { source, .. } => Some(source),
            DataLoadError::Tabular(e) => Some(e),
            DataLoadError::Geographic(e) => Some(e),
        }
    }
}

/// Both inputs, parsed but not yet normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub records: Vec<EmissionRecord>,
    pub features: Vec<GeoFeature>,
}

pub fn load_from_strs(csv: &str, geojson: &str) -> Result<LoadedData, DataLoadError> {
    let world = WorldFeatures::from_geojson_str(geojson).map_err(DataLoadError::Geographic)?;
    info!("world GeoJSON loaded: {} features", world.features.len());

    let table = EmissionTable::from_csv_str(csv).map_err(DataLoadError::Tabular)?;
    info!("raw CSV rows: {}", table.records.len() + table.skipped_rows);

    Ok(LoadedData {
        records: table.records,
        features: world.features,
    })
}

pub fn load_from_paths(
    csv_path: impl AsRef<Path>,
    geojson_path: impl AsRef<Path>,
) -> Result<LoadedData, DataLoadError> {
    let geojson = read(geojson_path.as_ref())?;
    let csv = read(csv_path.as_ref())?;
    load_from_strs(&csv, &geojson)
}

fn read(path: &Path) -> Result<String, DataLoadError> {
    fs::read_to_string(path).map_err(|e| DataLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
