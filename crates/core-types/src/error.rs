use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unknown timeframe '{0}'. Expected one of 5d, 1mo, 3mo, 6mo, ytd, 1y, 5y, max")]
    UnknownTimeframe(String),
}
