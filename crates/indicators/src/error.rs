use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Not enough history for {indicator}: need {required} observations, have {available}")]
    InsufficientHistory {
        indicator: String,
        required: usize,
        available: usize,
    },

    #[error("The price series is empty")]
    EmptySeries,

    #[error("Indicator received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
