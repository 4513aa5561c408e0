// In crates/simulator/src/stats.rs

use crate::types::{HorizonUnit, SimulationRun};
use crate::{Error, Result};
use analytics::metrics::{self, STANDARD_LEVELS};
use serde::Serialize;
use std::collections::BTreeMap;

/// Values at the 5th/25th/50th/75th/95th percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileSummary {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl PercentileSummary {
    pub fn from_values(values: &[f64]) -> Result<Self> {
        match metrics::percentiles(values, &STANDARD_LEVELS)?.as_slice() {
            &[p5, p25, p50, p75, p95] => Ok(Self { p5, p25, p50, p75, p95 }),
            _ => Err(Error::InsufficientData(
                "percentile summary needs five levels".to_string(),
            )),
        }
    }

    /// `(level, value)` pairs in ascending level order.
    pub fn levels(&self) -> [(u8, f64); 5] {
        [
            (5, self.p5),
            (25, self.p25),
            (50, self.p50),
            (75, self.p75),
            (95, self.p95),
        ]
    }
}

/// Summary of a [`SimulationRun`]. Returns, probabilities and drawdowns are
/// percentages; equities are currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    pub num_simulations: usize,
    pub horizon: usize,
    pub horizon_unit: HorizonUnit,
    pub initial_capital: f64,

    pub probability_profit: f64,
    pub prob_gain_10: f64,
    pub prob_gain_20: f64,
    pub prob_loss_10: f64,
    pub prob_loss_20: f64,

    pub expected_return: f64,
    pub median_return: f64,
    pub best_return: f64,
    pub worst_return: f64,
    pub return_percentiles: PercentileSummary,

    pub mean_final_equity: f64,
    pub median_final_equity: f64,
    pub best_final_equity: f64,
    pub worst_final_equity: f64,
    pub terminal_percentiles: PercentileSummary,

    pub mean_max_drawdown: f64,
    pub worst_max_drawdown: f64,
}

fn share_pct(values: &[f64], pred: impl Fn(f64) -> bool) -> f64 {
    let hits = values.iter().filter(|&&v| pred(v)).count();
    hits as f64 / values.len() as f64 * 100.0
}

fn extremes(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

impl StatisticsSnapshot {
    pub fn from_run(run: &SimulationRun) -> Result<Self> {
        let config = run.config();
        let initial = config.initial_capital;
        let finals = run.terminal_values();
        if finals.is_empty() {
            return Err(Error::InsufficientData(
                "simulation run has no paths".to_string(),
            ));
        }
        metrics::ensure_finite(&finals, "terminal equity")?;

        let returns: Vec<f64> = finals.iter().map(|f| (f / initial - 1.0) * 100.0).collect();
        let drawdowns = run
            .paths()
            .iter()
            .map(|p| p.max_drawdown().map(|d| d * 100.0))
            .collect::<Result<Vec<f64>>>()?;

        let terminal_percentiles = PercentileSummary::from_values(&finals)?;
        let return_percentiles = PercentileSummary::from_values(&returns)?;
        let (worst_final_equity, best_final_equity) = extremes(&finals);
        let (worst_return, best_return) = extremes(&returns);
        let (_, worst_max_drawdown) = extremes(&drawdowns);

        Ok(Self {
            num_simulations: finals.len(),
            horizon: config.horizon,
            horizon_unit: config.horizon_unit,
            initial_capital: initial,

            probability_profit: share_pct(&finals, |f| f > initial),
            prob_gain_10: share_pct(&returns, |r| r > 10.0),
            prob_gain_20: share_pct(&returns, |r| r > 20.0),
            prob_loss_10: share_pct(&returns, |r| r < -10.0),
            prob_loss_20: share_pct(&returns, |r| r < -20.0),

            expected_return: metrics::mean(&returns)?,
            median_return: return_percentiles.p50,
            best_return,
            worst_return,
            return_percentiles,

            mean_final_equity: metrics::mean(&finals)?,
            median_final_equity: terminal_percentiles.p50,
            best_final_equity,
            worst_final_equity,
            terminal_percentiles,

            mean_max_drawdown: metrics::mean(&drawdowns)?,
            worst_max_drawdown,
        })
    }

    /// Flat name/value view for programmatic consumers.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: f64| {
            map.insert(key.to_string(), value);
        };
        put("num_simulations", self.num_simulations as f64);
        put("horizon", self.horizon as f64);
        put("initial_capital", self.initial_capital);
        put("probability_profit", self.probability_profit);
        put("prob_gain_10", self.prob_gain_10);
        put("prob_gain_20", self.prob_gain_20);
        put("prob_loss_10", self.prob_loss_10);
        put("prob_loss_20", self.prob_loss_20);
        put("expected_return", self.expected_return);
        put("median_return", self.median_return);
        put("best_return", self.best_return);
        put("worst_return", self.worst_return);
        put("mean_final_equity", self.mean_final_equity);
        put("median_final_equity", self.median_final_equity);
        put("best_final_equity", self.best_final_equity);
        put("worst_final_equity", self.worst_final_equity);
        put("mean_max_drawdown", self.mean_max_drawdown);
        put("worst_max_drawdown", self.worst_max_drawdown);
        for (level, value) in self.terminal_percentiles.levels() {
            put(&format!("terminal_p{level}"), value);
        }
        for (level, value) in self.return_percentiles.levels() {
            put(&format!("return_p{level}"), value);
        }
        map
    }
}
