// Technical indicators module
// Implements EMA, RSI, MACD and Fibonacci retracement for daily closes

pub mod fibonacci;
pub mod macd;
pub mod moving_average;
pub mod rsi;

pub use fibonacci::{calculate_retracement, find_nearest_levels, DEFAULT_FIB_WINDOW, FIB_RATIOS};
pub use macd::calculate_macd;
pub use moving_average::{calculate_ema, ema_points, ema_series};
pub use rsi::{calculate_rsi, NEUTRAL_RSI};
