use super::moving_average::{ema_points, ema_series};
use crate::models::MacdResult;

/// Calculate MACD (Moving Average Convergence Divergence)
///
/// - MACD Line = EMA(fast) - EMA(slow), joined on the price index both
///   values close on
/// - Signal Line = EMA(signal) of the MACD line
/// - Histogram = MACD Line - Signal Line
///
/// Falls back to all zeros when either EMA is unavailable, and to a zero
/// signal line when the MACD line is shorter than `signal_period`.
pub fn calculate_macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdResult {
    let fast = ema_points(prices, fast_period);
    let slow = ema_points(prices, slow_period);

    if fast.is_empty() || slow.is_empty() {
        return MacdResult::default();
    }

    // Both series end on the last price, so the join is the slow series'
    // index range shifted into the fast series.
    let first_fast = fast[0].index;
    let macd_line: Vec<f64> = slow
        .iter()
        .filter_map(|s| {
            let f = fast.get(s.index.checked_sub(first_fast)?)?;
            debug_assert_eq!(f.index, s.index);
            Some(f.value - s.value)
        })
        .collect();

    let line = macd_line.last().copied().unwrap_or(0.0);
    let signal_line = ema_series(&macd_line, signal_period)
        .last()
        .copied()
        .unwrap_or(0.0);

    MacdResult {
        line,
        signal_line,
        histogram: line - signal_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_insufficient_data_is_zero() {
        let prices: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_macd(&prices, 12, 26, 9), MacdResult::default());
    }

    #[test]
    fn test_macd_without_signal_history() {
        // 30 prices: slow EMA has 5 values, too few for a 9-period signal
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let macd = calculate_macd(&prices, 12, 26, 9);
        assert!(macd.line > 0.0);
        assert_eq!(macd.signal_line, 0.0);
        assert_eq!(macd.histogram, macd.line);
    }

    #[test]
    fn test_macd_matches_offset_alignment() {
        let prices: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1)
            .collect();

        let fast = ema_series(&prices, 12);
        let slow = ema_series(&prices, 26);
        let offset = fast.len() - slow.len();
        let line: Vec<f64> = (0..slow.len()).map(|i| fast[i + offset] - slow[i]).collect();
        let signal = ema_series(&line, 9);

        let macd = calculate_macd(&prices, 12, 26, 9);
        assert_eq!(macd.line, *line.last().unwrap());
        assert_eq!(macd.signal_line, *signal.last().unwrap());
        assert_eq!(macd.histogram, macd.line - macd.signal_line);
    }

    #[test]
    fn test_macd_uptrend_is_positive() {
        let prices: Vec<f64> = (0..100).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let macd = calculate_macd(&prices, 12, 26, 9);
        assert!(macd.line > 0.0);
        assert!(macd.signal_line > 0.0);
    }

    #[test]
    fn test_macd_flat_is_zero() {
        let prices = vec![42.0; 60];
        let macd = calculate_macd(&prices, 12, 26, 9);
        assert_eq!(macd.line, 0.0);
        assert_eq!(macd.histogram, 0.0);
    }
}
