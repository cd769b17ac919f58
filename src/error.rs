use thiserror::Error;

/// Errors surfaced at the edges of the engine.
///
/// The indicator math itself never fails; these cover the caller-level
/// preconditions (non-empty, positive prices) and the collaborator seams.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Price series for {ticker} is empty")]
    EmptySeries { ticker: String },

    #[error("Invalid close price at index {index}: {value}")]
    InvalidPrice { index: usize, value: f64 },

    #[error("No price history for ticker {0}")]
    UnknownTicker(String),

    #[error("Price file for {ticker} has no '{column}' column")]
    MissingColumn { ticker: String, column: String },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}
