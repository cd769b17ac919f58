/// Neutral RSI reported when there is not enough data
pub const NEUTRAL_RSI: f64 = 50.0;

/// Calculate Relative Strength Index (RSI) with Wilder smoothing
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions.
///
/// The first average gain/loss is the plain mean over the first `period`
/// deltas; every later delta is folded in with
/// `avg = (avg * (period - 1) + current) / period`.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
/// Returns 50 when fewer than `period + 1` prices are available and 100 when
/// the smoothed average loss is zero (including a perfectly flat series).
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for window in prices[..=period].windows(2) {
        let change = window[1] - window[0];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += change.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let smoothing = (period - 1) as f64;
    for window in prices[period..].windows(2) {
        let change = window[1] - window[0];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, change.abs())
        };
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_rsi_calculation() {
        // Test with known values
        let prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5,
            46.0, 46.5, 46.25, 46.0, 46.5,
        ];

        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi > 0.0 && rsi < 100.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![100.0, 102.0, 101.0];
        assert_eq!(calculate_rsi(&prices, 14), NEUTRAL_RSI);

        // Exactly `period` prices is still one short
        let prices: Vec<f64> = (1..=14).map(|i| i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices: Vec<f64> = (1..=15).map(|i| i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), 100.0); // All gains = RSI 100
    }

    #[test]
    fn test_rsi_flat_series_is_100() {
        // No gains and no losses hits the zero-loss branch
        let prices = vec![42.0; 40];
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn test_rsi_flat_short_series_is_neutral() {
        let prices = vec![42.0; 10];
        assert_eq!(calculate_rsi(&prices, 14), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), 0.0);
    }

    #[test]
    fn test_rsi_uptrend_after_dip_approaches_100() {
        let mut prices = vec![100.0, 95.0];
        prices.extend((0..200).map(|i| 96.0 + i as f64));
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi > 99.0 && rsi < 100.0, "rsi = {}", rsi);
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // 14 alternating deltas of +1/-1 give avg gain = avg loss = 0.5,
        // then a +2 delta: gain = (0.5*13 + 2)/14, loss = 0.5*13/14
        let mut prices = vec![10.0];
        for i in 0..14 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let last = *prices.last().unwrap();
        prices.push(last + 2.0);

        let avg_gain = (0.5 * 13.0 + 2.0) / 14.0;
        let avg_loss = 0.5 * 13.0 / 14.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((calculate_rsi(&prices, 14) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_always_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let len = rng.gen_range(15..300);
            let mut price = 100.0;
            let prices: Vec<f64> = (0..len)
                .map(|_| {
                    price *= 1.0 + rng.gen_range(-0.08..0.08);
                    price
                })
                .collect();
            let rsi = calculate_rsi(&prices, 14);
            assert!((0.0..=100.0).contains(&rsi), "rsi out of range: {}", rsi);
        }
    }
}
