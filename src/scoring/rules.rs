use serde::{Deserialize, Serialize};

/// Comparison a rule applies to the scored value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// value > x
    Above(f64),
    /// value < x
    Below(f64),
    /// value >= x
    AtLeast(f64),
    /// value <= x
    AtMost(f64),
    /// lo <= value <= hi
    Between(f64, f64),
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::Above(x) => value > x,
            Threshold::Below(x) => value < x,
            Threshold::AtLeast(x) => value >= x,
            Threshold::AtMost(x) => value <= x,
            Threshold::Between(lo, hi) => lo <= value && value <= hi,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreRule {
    pub when: Threshold,
    pub points: i32,
}

impl ScoreRule {
    pub const fn new(when: Threshold, points: i32) -> Self {
        Self { when, points }
    }
}

/// Ordered threshold table; the first matching rule wins, no match scores 0
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RuleTable(pub Vec<ScoreRule>);

impl RuleTable {
    pub fn evaluate(&self, value: f64) -> i32 {
        self.matching_rule(value).map_or(0, |rule| rule.points)
    }

    pub fn matching_rule(&self, value: f64) -> Option<&ScoreRule> {
        self.0.iter().find(|rule| rule.when.matches(value))
    }

    /// Largest score the table can award (0 if every rule is negative)
    pub fn max_points(&self) -> i32 {
        self.0
            .iter()
            .map(|rule| rule.points)
            .max()
            .unwrap_or(0)
            .max(0)
    }
}

/// Position inside the Fibonacci window (0 = low, 1 = high)
pub fn default_fib_rules() -> RuleTable {
    RuleTable(vec![
        ScoreRule::new(Threshold::Above(1.0), 25),          // breakout above window
        ScoreRule::new(Threshold::Below(0.0), -25),         // breakdown below window
        ScoreRule::new(Threshold::Between(0.60, 0.65), 20), // golden pocket
        ScoreRule::new(Threshold::Between(0.75, 0.80), 15),
        ScoreRule::new(Threshold::Between(0.35, 0.40), 10),
        ScoreRule::new(Threshold::Above(0.764), 5),
        ScoreRule::new(Threshold::Below(0.30), -15),
    ])
}

pub fn default_rsi_rules() -> RuleTable {
    RuleTable(vec![
        ScoreRule::new(Threshold::AtMost(30.0), 20),
        ScoreRule::new(Threshold::AtMost(40.0), 10),
        ScoreRule::new(Threshold::AtLeast(70.0), -20),
        ScoreRule::new(Threshold::AtLeast(60.0), -10),
    ])
}
