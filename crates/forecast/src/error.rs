use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Not enough history to forecast: need {required} observations, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Input contains invalid values: {0}")]
    InvalidData(String),

    #[error("Invalid forecast parameters: {0}")]
    InvalidParameters(String),

    #[error("Model fit failed: {0}")]
    Fit(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
