use crate::models::SignalResult;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Sink for computed signals, keyed uniquely by `(ticker, date)`
pub trait SignalStore {
    /// Insert or replace the result for its `(ticker, as_of)` key.
    /// Returns the previous value if one was replaced.
    fn upsert(&mut self, result: SignalResult) -> Option<SignalResult>;

    fn get(&self, ticker: &str, date: NaiveDate) -> Option<&SignalResult>;

    /// Most recent result for a ticker
    fn latest(&self, ticker: &str) -> Option<&SignalResult>;
}

/// In-memory signal store, ordered by ticker then date
#[derive(Debug, Default)]
pub struct MemorySignalStore {
    signals: BTreeMap<(String, NaiveDate), SignalResult>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalResult> {
        self.signals.values()
    }
}

impl SignalStore for MemorySignalStore {
    fn upsert(&mut self, result: SignalResult) -> Option<SignalResult> {
        let key = (result.ticker.clone(), result.as_of);
        let previous = self.signals.insert(key, result);
        if let Some(prev) = &previous {
            tracing::debug!("Replaced signal for {} on {}", prev.ticker, prev.as_of);
        }
        previous
    }

    fn get(&self, ticker: &str, date: NaiveDate) -> Option<&SignalResult> {
        self.signals.get(&(ticker.to_string(), date))
    }

    fn latest(&self, ticker: &str) -> Option<&SignalResult> {
        let first = (ticker.to_string(), NaiveDate::MIN);
        let last = (ticker.to_string(), NaiveDate::MAX);
        self.signals
            .range(first..=last)
            .next_back()
            .map(|(_, result)| result)
    }
}
