// Signal engine: price history in, SignalResult out
pub mod config;

pub use config::EngineConfig;

use crate::data::validate_closes;
use crate::indicators::{
    calculate_ema, calculate_macd, calculate_retracement, calculate_rsi, find_nearest_levels,
};
use crate::models::{MovingAverages, SignalResult};
use crate::scoring::ScoreInputs;
use crate::Result;
use chrono::NaiveDate;
use rayon::prelude::*;

/// One analysis job for [`SignalEngine::analyze_batch`]
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub closes: Vec<f64>,
    pub as_of: NaiveDate,
}

/// Deterministic technical-analysis engine
///
/// Holds only configuration; every call is a pure function of its inputs, so
/// one engine can be shared across threads freely.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a chronologically ordered series of closes (oldest first).
    ///
    /// Fails only on an empty series or a non-finite/non-positive price.
    /// Short series degrade each indicator to its neutral default instead.
    pub fn analyze(&self, ticker: &str, closes: &[f64], as_of: NaiveDate) -> Result<SignalResult> {
        validate_closes(ticker, closes)?;
        Ok(self.compute(ticker, closes, as_of).rounded())
    }

    /// Analyze many independent series in parallel
    ///
    /// Results come back in request order.
    pub fn analyze_batch(
        &self,
        requests: &[AnalysisRequest],
    ) -> Vec<(String, Result<SignalResult>)> {
        requests
            .par_iter()
            .map(|req| {
                let result = self.analyze(&req.ticker, &req.closes, req.as_of);
                (req.ticker.clone(), result)
            })
            .collect()
    }

    fn compute(&self, ticker: &str, closes: &[f64], as_of: NaiveDate) -> SignalResult {
        let config = &self.config;
        // validated non-empty
        let price = closes[closes.len() - 1];

        let rsi = calculate_rsi(closes, config.rsi_period);

        let [p9, p21, p50, p200] = config.ema_periods;
        let moving_averages = MovingAverages {
            ema_9: calculate_ema(closes, p9),
            ema_21: calculate_ema(closes, p21),
            ema_50: calculate_ema(closes, p50),
            ema_200: calculate_ema(closes, p200),
        };

        let macd = calculate_macd(
            closes,
            config.macd_fast,
            config.macd_slow,
            config.macd_signal,
        );
        let levels = calculate_retracement(closes, config.fib_window);
        let nearest = find_nearest_levels(price, &levels);

        let breakdown = config.scoring.breakdown(&ScoreInputs {
            price,
            rsi,
            moving_averages: &moving_averages,
            macd: &macd,
            levels: &levels,
            nearest: &nearest,
        });
        let score = breakdown.total();
        let label = config.scoring.label_for_score(score);

        tracing::debug!(
            "{} {}: price={:.2} rsi={:.1} fib={} rsi_pts={} ma={} prox={} macd={} => {} ({})",
            ticker,
            as_of,
            price,
            rsi,
            breakdown.fibonacci,
            breakdown.rsi,
            breakdown.moving_average,
            breakdown.proximity,
            breakdown.macd,
            score,
            label
        );

        SignalResult {
            ticker: ticker.to_string(),
            as_of,
            price,
            rsi,
            moving_averages,
            macd,
            levels,
            nearest,
            breakdown,
            score,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::SignalLabel;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_empty_series_rejected() {
        let engine = SignalEngine::default();
        let result = engine.analyze("AAPL", &[], date());
        assert!(matches!(result, Err(EngineError::EmptySeries { .. })));
    }

    #[test]
    fn test_invalid_price_rejected() {
        let engine = SignalEngine::default();
        let result = engine.analyze("AAPL", &[10.0, f64::NAN, 12.0], date());
        assert!(matches!(result, Err(EngineError::InvalidPrice { index: 1, .. })));

        let result = engine.analyze("AAPL", &[10.0, 0.0], date());
        assert!(matches!(result, Err(EngineError::InvalidPrice { index: 1, .. })));
    }

    #[test]
    fn test_single_price_degrades() {
        let engine = SignalEngine::default();
        let result = engine.analyze("AAPL", &[100.0], date()).unwrap();

        assert_eq!(result.rsi, 50.0);
        assert_eq!(result.moving_averages.ema_9, None);
        assert_eq!(result.macd.line, 0.0);
        assert_eq!(result.levels.high, 100.0);
        assert_eq!(result.nearest.support, Some(100.0));
        assert_eq!(result.nearest.resistance, Some(100.0));
        // flat window -15, neutral RSI 0, no EMAs 0, on-level 0, zero MACD -12
        assert_eq!(result.breakdown.fibonacci, -15);
        assert_eq!(result.breakdown.macd, -12);
        assert_eq!(result.score, -27);
        assert_eq!(result.label, SignalLabel::Sell);
    }

    #[test]
    fn test_uptrend_result() {
        let engine = SignalEngine::default();
        let closes: Vec<f64> = (0..250).map(|i| 100.0 * 1.005f64.powi(i)).collect();
        let result = engine.analyze("UP", &closes, date()).unwrap();

        assert_eq!(result.rsi, 100.0);
        assert_eq!(result.breakdown.rsi, -20);
        assert_eq!(result.breakdown.moving_average, 20);
        assert_eq!(result.breakdown.macd, 15);
        assert_eq!(result.breakdown.fibonacci, 5); // at the window high
        assert_eq!(result.nearest.resistance, Some(result.price));
        assert_eq!(result.nearest.resistance, Some(result.levels.high));
        assert!(result.moving_averages.ema_200.is_some());
        assert_eq!(result.score, 20);
        assert_eq!(result.label, SignalLabel::Buy);
    }

    #[test]
    fn test_steady_decline_is_oversold_not_bearish() {
        // A constant-rate decline: MACD line flattens toward zero above its
        // lagging signal, and RSI 0 earns the oversold points.
        let engine = SignalEngine::default();
        let closes: Vec<f64> = (0..250).map(|i| 300.0 * 0.995f64.powi(i)).collect();
        let result = engine.analyze("DOWN", &closes, date()).unwrap();

        assert_eq!(result.rsi, 0.0);
        assert!(result.macd.line < 0.0);
        assert!(result.macd.histogram > 0.0);
        assert_eq!(result.breakdown.fibonacci, -15); // at the window low
        assert_eq!(result.breakdown.rsi, 20);
        assert_eq!(result.breakdown.moving_average, -20);
        assert_eq!(result.breakdown.proximity, 0);
        assert_eq!(result.breakdown.macd, 9);
        assert_eq!(result.score, -6);
        assert_eq!(result.label, SignalLabel::Neutral);
    }

    #[test]
    fn test_output_rounding() {
        let engine = SignalEngine::default();
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 3.3333 + i as f64 * 0.0777)
            .collect();
        let result = engine.analyze("RND", &closes, date()).unwrap();

        let is_rounded = |v: f64, places: i32| {
            let factor = 10f64.powi(places);
            ((v * factor).round() / factor - v).abs() < 1e-9
        };
        assert!(is_rounded(result.rsi, 2));
        assert!(is_rounded(result.levels.level_618, 2));
        assert!(is_rounded(result.moving_averages.ema_50.unwrap(), 2));
        assert!(is_rounded(result.macd.line, 4));
        assert!(is_rounded(result.macd.histogram, 4));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let engine = SignalEngine::default();
        let closes: Vec<f64> = (0..300)
            .map(|i| 50.0 + (i as f64 * 0.11).cos() * 7.0)
            .collect();
        let first = engine.analyze("IDEM", &closes, date()).unwrap();
        let second = engine.analyze("IDEM", &closes, date()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_batch_matches_sequential() {
        let engine = SignalEngine::default();
        let requests: Vec<AnalysisRequest> = (0..16)
            .map(|n| AnalysisRequest {
                ticker: format!("T{}", n),
                closes: (0..(20 + n * 15))
                    .map(|i| 100.0 + ((i + n) as f64 * 0.2).sin() * n as f64)
                    .collect(),
                as_of: date(),
            })
            .chain(std::iter::once(AnalysisRequest {
                ticker: "EMPTY".to_string(),
                closes: Vec::new(),
                as_of: date(),
            }))
            .collect();

        let results = engine.analyze_batch(&requests);
        assert_eq!(results.len(), requests.len());

        for (req, (ticker, result)) in requests.iter().zip(&results) {
            assert_eq!(&req.ticker, ticker);
            match engine.analyze(&req.ticker, &req.closes, req.as_of) {
                Ok(expected) => assert_eq!(result.as_ref().unwrap(), &expected),
                Err(_) => assert!(result.is_err()),
            }
        }
    }
}
