use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough overlapping observations for a regression: need {required}, got {actual}")]
    InsufficientOverlap { required: usize, actual: usize },

    #[error("Column '{0}' is not present in the table")]
    UnknownColumn(String),

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),

    #[error("Regression is degenerate: {0}")]
    Degenerate(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
