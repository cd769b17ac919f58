use crate::models::IndexedValue;

/// Calculate the full Exponential Moving Average (EMA) series
///
/// Seeded with the SMA of the first `period` prices, then
/// `ema = prev + (price - prev) * 2 / (period + 1)` for every later price.
///
/// Returns `len - period + 1` values, or an empty vec when the series is
/// shorter than `period` (indicator unavailable).
pub fn ema_series(prices: &[f64], period: usize) -> Vec<f64> {
    ema_points(prices, period)
        .into_iter()
        .map(|point| point.value)
        .collect()
}

/// Same as [`ema_series`] but every value carries the index of the price it
/// was computed on, so series with different periods can be joined by index.
pub fn ema_points(prices: &[f64], period: usize) -> Vec<IndexedValue> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut points = Vec::with_capacity(prices.len() - period + 1);

    // Start with SMA
    let mut ema = prices[..period].iter().sum::<f64>() / period as f64;
    points.push(IndexedValue {
        index: period - 1,
        value: ema,
    });

    for (index, price) in prices.iter().enumerate().skip(period) {
        ema += (price - ema) * multiplier;
        points.push(IndexedValue { index, value: ema });
    }

    points
}

/// Latest EMA value, `None` if the series is shorter than `period`
pub fn calculate_ema(prices: &[f64], period: usize) -> Option<f64> {
    ema_points(prices, period).last().map(|point| point.value)
}
