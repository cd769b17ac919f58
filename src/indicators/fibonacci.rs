//! Fibonacci retracement levels and nearest support/resistance lookup

use crate::models::{NearestLevels, RetracementLevels};

/// Retracement ratios measured down from the window high
pub const FIB_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Default trailing window (trading days)
pub const DEFAULT_FIB_WINDOW: usize = 60;

/// Calculate retracement levels over the trailing `window` prices
///
/// Uses the whole series when it is shorter than `window`. A flat window
/// collapses every level onto the single price.
///
/// Callers must pass a non-empty series.
pub fn calculate_retracement(prices: &[f64], window: usize) -> RetracementLevels {
    let start = prices.len().saturating_sub(window.max(1));
    let recent = &prices[start..];

    let high = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().copied().fold(f64::INFINITY, f64::min);
    let range = high - low;
    let level = |ratio: f64| high - range * ratio;

    RetracementLevels {
        high,
        low,
        level_236: level(FIB_RATIOS[0]),
        level_382: level(FIB_RATIOS[1]),
        level_500: level(FIB_RATIOS[2]),
        level_618: level(FIB_RATIOS[3]),
        level_786: level(FIB_RATIOS[4]),
    }
}

/// Find the closest level at-or-below (support) and at-or-above
/// (resistance) the current price
///
/// A price sitting exactly on a level counts it as both.
pub fn find_nearest_levels(current_price: f64, levels: &RetracementLevels) -> NearestLevels {
    let candidates = levels.as_array();

    let support = candidates
        .iter()
        .copied()
        .filter(|&level| level <= current_price)
        .reduce(f64::max);
    let resistance = candidates
        .iter()
        .copied()
        .filter(|&level| level >= current_price)
        .reduce(f64::min);

    NearestLevels {
        support,
        resistance,
    }
}
