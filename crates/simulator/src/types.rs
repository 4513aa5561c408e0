// In crates/simulator/src/types.rs

use crate::stats::StatisticsSnapshot;
use crate::{Result, report};
use analytics::metrics;
use serde::Serialize;

/// Capital over discrete steps. Index 0 is the starting capital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPath(Vec<f64>);

impl EquityPath {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn initial(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn terminal(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Highest capital seen up to and including each step.
    pub fn running_max(&self) -> Vec<f64> {
        self.0
            .iter()
            .scan(f64::NEG_INFINITY, |peak, &value| {
                *peak = peak.max(value);
                Some(*peak)
            })
            .collect()
    }

    /// Largest peak-to-trough decline as a fraction of the peak.
    pub fn max_drawdown(&self) -> Result<f64> {
        Ok(metrics::max_drawdown(&self.0)?)
    }
}

/// What one step of a path stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonUnit {
    Days,
    Trades,
}

impl HorizonUnit {
    pub fn label(&self) -> &'static str {
        match self {
            HorizonUnit::Days => "days",
            HorizonUnit::Trades => "trades",
        }
    }
}

/// How a drawn value is applied to capital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// `capital * (1 + r)` for a fractional return.
    Multiplicative,
    /// `capital + pnl` for a currency amount.
    Additive,
}

/// The parameters a run was actually generated with, seed included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunConfig {
    pub num_simulations: usize,
    pub horizon: usize,
    pub initial_capital: f64,
    pub seed: u64,
    pub horizon_unit: HorizonUnit,
    pub compounding: Compounding,
    /// Mean of the distribution the steps were drawn from.
    pub source_mean: f64,
}

impl RunConfig {
    /// Terminal capital implied by the source mean alone, with no sampling.
    pub fn expected_terminal(&self) -> f64 {
        match self.compounding {
            Compounding::Multiplicative => {
                let growth = 1.0 + self.source_mean;
                let factor = match i32::try_from(self.horizon) {
                    Ok(periods) => growth.powi(periods),
                    Err(_) => growth.powf(self.horizon as f64),
                };
                self.initial_capital * factor
            }
            Compounding::Additive => self.initial_capital + self.horizon as f64 * self.source_mean,
        }
    }
}

/// Output of one simulator invocation. Never mutated after generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    paths: Vec<EquityPath>,
    config: RunConfig,
}

impl SimulationRun {
    pub(crate) fn new(paths: Vec<EquityPath>, config: RunConfig) -> Self {
        Self { paths, config }
    }

    pub fn paths(&self) -> &[EquityPath] {
        &self.paths
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Terminal capital of every path, in path order.
    pub fn terminal_values(&self) -> Vec<f64> {
        self.paths.iter().filter_map(EquityPath::terminal).collect()
    }

    pub fn expected_terminal(&self) -> f64 {
        self.config.expected_terminal()
    }

    pub fn calculate_statistics(&self) -> Result<StatisticsSnapshot> {
        StatisticsSnapshot::from_run(self)
    }

    pub fn generate_report(&self) -> Result<String> {
        let stats = self.calculate_statistics()?;
        Ok(report::render_statistics(&stats, &self.config))
    }
}
