//! Composite signal scoring
//!
//! Five bounded sub-scores (Fibonacci position, RSI, EMA alignment,
//! support/resistance proximity, MACD momentum) are summed and clamped to
//! `[-100, 100]`, then mapped to a [`SignalLabel`].

pub mod rules;

pub use rules::{default_fib_rules, default_rsi_rules, RuleTable, ScoreRule, Threshold};

use crate::models::{
    MacdResult, MovingAverages, NearestLevels, RetracementLevels, ScoreBreakdown, SignalLabel,
};
use serde::{Deserialize, Serialize};

/// Weights and thresholds for every sub-score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub fib_rules: RuleTable,
    pub rsi_rules: RuleTable,
    /// Points for price above (or minus for below) EMA 9/21/50/200
    pub ma_weights: [i32; 4],
    /// Bonus for strict bullish (or bearish) stacking of the EMAs
    pub ma_order_bonus: i32,
    pub ma_cap: i32,
    /// Distance to a level as a fraction of price
    pub proximity_near_pct: f64,
    pub proximity_near_points: i32,
    pub proximity_far_pct: f64,
    pub proximity_far_points: i32,
    pub proximity_cap: i32,
    pub macd_cross_points: i32,
    pub macd_histogram_points: i32,
    pub macd_zero_line_points: i32,
    pub macd_cap: i32,
    pub strong_buy_cutoff: i32,
    pub buy_cutoff: i32,
    pub sell_cutoff: i32,
    pub strong_sell_cutoff: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fib_rules: default_fib_rules(),
            rsi_rules: default_rsi_rules(),
            ma_weights: [5, 4, 4, 3],
            ma_order_bonus: 4,
            ma_cap: 20,
            proximity_near_pct: 0.02,
            proximity_near_points: 12,
            proximity_far_pct: 0.05,
            proximity_far_points: 6,
            proximity_cap: 15,
            macd_cross_points: 7,
            macd_histogram_points: 5,
            macd_zero_line_points: 3,
            macd_cap: 15,
            strong_buy_cutoff: 50,
            buy_cutoff: 20,
            sell_cutoff: -20,
            strong_sell_cutoff: -50,
        }
    }
}

/// Indicator values the scorer reads
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub price: f64,
    pub rsi: f64,
    pub moving_averages: &'a MovingAverages,
    pub macd: &'a MacdResult,
    pub levels: &'a RetracementLevels,
    pub nearest: &'a NearestLevels,
}

impl ScoringConfig {
    /// Compute every sub-score
    pub fn breakdown(&self, inputs: &ScoreInputs<'_>) -> ScoreBreakdown {
        ScoreBreakdown {
            fibonacci: self.fib_score(inputs.price, inputs.levels),
            rsi: self.rsi_score(inputs.rsi),
            moving_average: self.ma_alignment_score(inputs.price, inputs.moving_averages),
            proximity: self.proximity_score(inputs.price, inputs.nearest),
            macd: self.macd_score(inputs.macd),
        }
    }

    /// Score the price position inside the retracement window.
    ///
    /// A flat window has position 0.
    pub fn fib_score(&self, price: f64, levels: &RetracementLevels) -> i32 {
        let position = levels.position(price).unwrap_or(0.0);
        self.fib_rules.evaluate(position)
    }

    pub fn rsi_score(&self, rsi: f64) -> i32 {
        self.rsi_rules.evaluate(rsi)
    }

    /// Price vs each EMA plus a bonus for strict stacking order.
    ///
    /// Unavailable EMAs contribute nothing and void the ordering bonus.
    pub fn ma_alignment_score(&self, price: f64, averages: &MovingAverages) -> i32 {
        let values = averages.as_array();

        let mut score: i32 = values
            .iter()
            .zip(self.ma_weights)
            .map(|(ema, weight)| match ema {
                Some(ema) if price > *ema => weight,
                Some(ema) if price < *ema => -weight,
                _ => 0,
            })
            .sum();

        if let [Some(e9), Some(e21), Some(e50), Some(e200)] = values {
            if e9 > e21 && e21 > e50 && e50 > e200 {
                score += self.ma_order_bonus;
            } else if e9 < e21 && e21 < e50 && e50 < e200 {
                score -= self.ma_order_bonus;
            }
        }

        score.clamp(-self.ma_cap, self.ma_cap)
    }

    /// Reward sitting just above support, penalize sitting just under
    /// resistance
    pub fn proximity_score(&self, price: f64, nearest: &NearestLevels) -> i32 {
        let mut score = 0;

        if let Some(support) = nearest.support {
            score += self.distance_points((price - support) / price);
        }
        if let Some(resistance) = nearest.resistance {
            score -= self.distance_points((resistance - price) / price);
        }

        score.clamp(-self.proximity_cap, self.proximity_cap)
    }

    fn distance_points(&self, distance: f64) -> i32 {
        if distance <= self.proximity_near_pct {
            self.proximity_near_points
        } else if distance <= self.proximity_far_pct {
            self.proximity_far_points
        } else {
            0
        }
    }

    pub fn macd_score(&self, macd: &MacdResult) -> i32 {
        let mut score = if macd.line > macd.signal_line {
            self.macd_cross_points
        } else {
            -self.macd_cross_points
        };

        score += if macd.histogram > 0.0 {
            self.macd_histogram_points
        } else {
            -self.macd_histogram_points
        };

        if macd.line > 0.0 && macd.signal_line > 0.0 {
            score += self.macd_zero_line_points;
        } else if macd.line < 0.0 && macd.signal_line < 0.0 {
            score -= self.macd_zero_line_points;
        }

        score.clamp(-self.macd_cap, self.macd_cap)
    }

    /// Ordered score → label table, first match wins
    pub fn label_rules(&self) -> [(Threshold, SignalLabel); 4] {
        [
            (Threshold::AtLeast(self.strong_buy_cutoff as f64), SignalLabel::StrongBuy),
            (Threshold::AtLeast(self.buy_cutoff as f64), SignalLabel::Buy),
            (Threshold::AtMost(self.strong_sell_cutoff as f64), SignalLabel::StrongSell),
            (Threshold::AtMost(self.sell_cutoff as f64), SignalLabel::Sell),
        ]
    }

    pub fn label_for_score(&self, score: i32) -> SignalLabel {
        self.label_rules()
            .into_iter()
            .find(|(when, _)| when.matches(score as f64))
            .map_or(SignalLabel::Neutral, |(_, label)| label)
    }

    /// Sum of each sub-score's positive ceiling
    pub fn max_positive_total(&self) -> i32 {
        self.fib_rules.max_points()
            + self.rsi_rules.max_points()
            + self.ma_cap
            + self.proximity_cap
            + self.macd_cap
    }
}
