use formats::loader::DataLoadError;
use formats::normalize::NoDataError;

use crate::config::ConfigError;

/// Anything that stops the viewer from drawing at all.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Load(DataLoadError),
    NoData(NoDataError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Config(e) => write!(f, "{e}"),
            PipelineError::Load(e) => write!(f, "error loading data: {e}"),
            PipelineError::NoData(e) => write!(f, "nothing to show: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Config(e) => Some(e),
            PipelineError::Load(e) => Some(e),
            PipelineError::NoData(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e)
    }
}

impl From<DataLoadError> for PipelineError {
    fn from(e: DataLoadError) -> Self {
        PipelineError::Load(e)
    }
}

impl From<NoDataError> for PipelineError {
    fn from(e: NoDataError) -> Self {
        PipelineError::NoData(e)
    }
}
