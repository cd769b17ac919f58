use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarketScenario {
    /// Steady uptrend with noise (+0.4% daily average)
    Uptrend,
    /// Steady downtrend with noise (-0.4% daily average)
    Downtrend,
    /// Sideways/choppy market (mean-reverting around the base price)
    Sideways,
    /// High volatility (±5% daily swings)
    Volatile,
    /// Constant price
    Flat,
}

impl MarketScenario {
    pub const ALL: [MarketScenario; 5] = [
        MarketScenario::Uptrend,
        MarketScenario::Downtrend,
        MarketScenario::Sideways,
        MarketScenario::Volatile,
        MarketScenario::Flat,
    ];
}

/// Synthetic daily close series with calendar dates
#[derive(Debug, Clone)]
pub struct SyntheticSeries {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
}

/// Generates reproducible daily close series
pub struct SyntheticSeriesGenerator {
    rng: StdRng,
    base_price: f64,
}

impl SyntheticSeriesGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
        }
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    /// Generate `days` consecutive daily closes ending on `end`
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        days: usize,
        end: NaiveDate,
    ) -> SyntheticSeries {
        let closes = self.closes(scenario, days);
        let dates = (0..days)
            .map(|i| end - Duration::days((days - 1 - i) as i64))
            .collect();
        SyntheticSeries { dates, closes }
    }

    /// Generate `days` closes for a scenario
    pub fn closes(&mut self, scenario: MarketScenario, days: usize) -> Vec<f64> {
        let mut closes = Vec::with_capacity(days);
        let mut price = self.base_price;

        for _ in 0..days {
            price = match scenario {
                MarketScenario::Uptrend => price * (1.0 + 0.004 + self.noise(0.01)),
                MarketScenario::Downtrend => price * (1.0 - 0.004 + self.noise(0.01)),
                MarketScenario::Sideways => {
                    // Pull back toward the base price
                    let reversion = (self.base_price - price) / self.base_price * 0.1;
                    price * (1.0 + reversion + self.noise(0.01))
                }
                MarketScenario::Volatile => price * (1.0 + self.noise(0.05)),
                MarketScenario::Flat => price,
            };
            // Never let a price go non-positive
            price = price.max(0.01);
            closes.push(price);
        }

        closes
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.gen_range(-amplitude..amplitude)
    }
}
