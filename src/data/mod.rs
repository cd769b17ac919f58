// Collaborator seams around the engine: where price history comes from and
// where results go.
pub mod csv_provider;
pub mod store;

pub use csv_provider::CsvPriceProvider;
pub use store::{MemorySignalStore, SignalStore};

use crate::error::EngineError;
use crate::Result;
use chrono::NaiveDate;

/// Daily closes for one ticker, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
}

impl PriceHistory {
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// History truncated to rows dated on or before `as_of`
    pub fn up_to(&self, as_of: NaiveDate) -> PriceHistory {
        let end = self.dates.partition_point(|date| *date <= as_of);
        PriceHistory {
            ticker: self.ticker.clone(),
            dates: self.dates[..end].to_vec(),
            closes: self.closes[..end].to_vec(),
        }
    }
}

/// Source of daily close history
pub trait PriceHistoryProvider: Send + Sync {
    fn history(&self, ticker: &str) -> Result<PriceHistory>;

    fn tickers(&self) -> Result<Vec<String>>;
}

/// Reject series the engine cannot analyze: empty, or containing a
/// non-finite or non-positive close. Ordering is not checked.
pub fn validate_closes(ticker: &str, closes: &[f64]) -> Result<()> {
    if closes.is_empty() {
        return Err(EngineError::EmptySeries {
            ticker: ticker.to_string(),
        });
    }

    if let Some((index, &value)) = closes
        .iter()
        .enumerate()
        .find(|(_, close)| !close.is_finite() || **close <= 0.0)
    {
        return Err(EngineError::InvalidPrice { index, value });
    }

    Ok(())
}
