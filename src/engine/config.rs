use crate::indicators::DEFAULT_FIB_WINDOW;
use crate::scoring::ScoringConfig;
use crate::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Indicator periods and scoring rules used by [`super::SignalEngine`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub rsi_period: usize,
    /// Trend EMAs, fast to slow
    pub ema_periods: [usize; 4],
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub fib_window: usize,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_periods: [9, 21, 50, 200],
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            fib_window: DEFAULT_FIB_WINDOW,
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration: defaults, then an optional TOML/JSON file, then
    /// `SIGNAL_*` environment variables (`__` separates nested keys, e.g.
    /// `SIGNAL_SCORING__BUY_CUTOFF=25`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            tracing::debug!("Loading engine config from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("SIGNAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Longest look-back any indicator uses
    pub fn longest_period(&self) -> usize {
        self.ema_periods
            .iter()
            .copied()
            .chain([
                self.rsi_period + 1,
                self.macd_slow + self.macd_signal - 1,
                self.fib_window,
            ])
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.ema_periods, [9, 21, 50, 200]);
        assert_eq!(config.fib_window, 60);
        assert_eq!(config.longest_period(), 200);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "fib_window = 90\n\n[scoring]\nbuy_cutoff = 25\nma_weights = [6, 4, 4, 2]"
        )
        .unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.fib_window, 90);
        assert_eq!(config.scoring.buy_cutoff, 25);
        assert_eq!(config.scoring.ma_weights, [6, 4, 4, 2]);
        // untouched keys keep their defaults
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.scoring.strong_buy_cutoff, 50);
        assert_eq!(config.scoring.rsi_rules, crate::scoring::default_rsi_rules());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = EngineConfig::load(Some(Path::new("/nonexistent/engine.toml")));
        assert!(result.is_err());
    }
}
