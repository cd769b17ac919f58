use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical signal label, ordered from most bearish to most bullish
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalLabel {
    StrongSell,
    Sell,
    Neutral,
    Buy,
    StrongBuy,
}

impl SignalLabel {
    pub const ALL: [SignalLabel; 5] = [
        SignalLabel::StrongSell,
        SignalLabel::Sell,
        SignalLabel::Neutral,
        SignalLabel::Buy,
        SignalLabel::StrongBuy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::StrongSell => "strong_sell",
            SignalLabel::Sell => "sell",
            SignalLabel::Neutral => "neutral",
            SignalLabel::Buy => "buy",
            SignalLabel::StrongBuy => "strong_buy",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SignalLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| format!("Unknown signal label: {}", s))
    }
}

/// Moving-average value tagged with the index of the price it closes on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedValue {
    pub index: usize,
    pub value: f64,
}

/// Fibonacci retracement levels over one trailing window
///
/// `high >= level_236 >= ... >= level_786 >= low` by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RetracementLevels {
    pub high: f64,
    pub low: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_500: f64,
    pub level_618: f64,
    pub level_786: f64,
}

impl RetracementLevels {
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Where `price` sits inside the window: 0 at the low, 1 at the high.
    ///
    /// Returns `None` for a flat window.
    pub fn position(&self, price: f64) -> Option<f64> {
        let range = self.range();
        if range == 0.0 {
            return None;
        }
        Some((price - self.low) / range)
    }

    /// All seven levels, lowest first
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.low,
            self.level_786,
            self.level_618,
            self.level_500,
            self.level_382,
            self.level_236,
            self.high,
        ]
    }
}

/// MACD line, signal line and histogram (`line - signal_line`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MacdResult {
    pub line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Closest retracement level at-or-below and at-or-above the current price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct NearestLevels {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

/// The four trend EMAs, fast to slow. `None` when the series is too short.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MovingAverages {
    pub ema_9: Option<f64>,
    pub ema_21: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
}

impl MovingAverages {
    pub fn as_array(&self) -> [Option<f64>; 4] {
        [self.ema_9, self.ema_21, self.ema_50, self.ema_200]
    }
}

/// Individual sub-scores that make up the composite score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub fibonacci: i32,
    pub rsi: i32,
    pub moving_average: i32,
    pub proximity: i32,
    pub macd: i32,
}

impl ScoreBreakdown {
    /// Sum of all sub-scores clamped to `[-100, 100]`
    pub fn total(&self) -> i32 {
        (self.fibonacci + self.rsi + self.moving_average + self.proximity + self.macd)
            .clamp(-100, 100)
    }
}

/// Full technical-analysis result for one ticker on one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalResult {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub price: f64,
    pub rsi: f64,
    pub moving_averages: MovingAverages,
    pub macd: MacdResult,
    pub levels: RetracementLevels,
    pub nearest: NearestLevels,
    pub breakdown: ScoreBreakdown,
    pub score: i32,
    pub label: SignalLabel,
}

impl SignalResult {
    /// Apply output rounding: 2 decimals for prices, RSI, averages and
    /// levels; 4 decimals for MACD values.
    pub fn rounded(mut self) -> Self {
        self.price = round_to(self.price, 2);
        self.rsi = round_to(self.rsi, 2);

        let ma = &mut self.moving_averages;
        for value in [&mut ma.ema_9, &mut ma.ema_21, &mut ma.ema_50, &mut ma.ema_200] {
            *value = value.map(|v| round_to(v, 2));
        }

        self.macd.line = round_to(self.macd.line, 4);
        self.macd.signal_line = round_to(self.macd.signal_line, 4);
        self.macd.histogram = round_to(self.macd.histogram, 4);

        let lv = &mut self.levels;
        for value in [
            &mut lv.high,
            &mut lv.low,
            &mut lv.level_236,
            &mut lv.level_382,
            &mut lv.level_500,
            &mut lv.level_618,
            &mut lv.level_786,
        ] {
            *value = round_to(*value, 2);
        }

        self.nearest.support = self.nearest.support.map(|v| round_to(v, 2));
        self.nearest.resistance = self.nearest.resistance.map(|v| round_to(v, 2));
        self
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
