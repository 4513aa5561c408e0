// In crates/simulator/src/path.rs

use crate::cancel::CancellationToken;
use crate::config::SimulationConfig;
use crate::pool;
use crate::types::{Compounding, EquityPath, HorizonUnit, RunConfig, SimulationRun};
use crate::{Error, Result};
use core_types::ReturnSeries;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Distribution each period's return is drawn from.
#[derive(Debug, Clone, Copy)]
pub enum ReturnModel<'a> {
    /// Bootstrap: draw with replacement from the observed returns.
    Empirical(&'a ReturnSeries),
    /// Parametric: i.i.d. normal returns.
    Normal { mean: f64, std_dev: f64 },
}

impl ReturnModel<'_> {
    /// Normal model with the series' own mean and standard deviation.
    pub fn fitted_normal(series: &ReturnSeries) -> Result<ReturnModel<'static>> {
        if series.is_empty() {
            return Err(Error::InvalidConfiguration(
                "return series is empty".to_string(),
            ));
        }
        Ok(ReturnModel::Normal {
            mean: series.mean()?,
            std_dev: series.std_dev()?,
        })
    }

    fn mean(&self) -> Result<f64> {
        match self {
            ReturnModel::Empirical(series) => Ok(series.mean()?),
            ReturnModel::Normal { mean, .. } => Ok(*mean),
        }
    }
}

/// Draws one return per period and compounds capital multiplicatively.
/// Capital is floored at zero: a draw of -100% or worse ruins the path and
/// it stays at zero for the rest of the horizon.
#[derive(Debug, Clone)]
pub struct PathSimulator {
    config: SimulationConfig,
}

impl PathSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Bootstrap simulation over an observed return series.
    pub fn simulate(&self, series: &ReturnSeries) -> Result<SimulationRun> {
        self.simulate_with(&ReturnModel::Empirical(series), &CancellationToken::new())
    }

    /// Simulation with normally distributed returns.
    pub fn simulate_normal(&self, mean: f64, std_dev: f64) -> Result<SimulationRun> {
        self.simulate_with(
            &ReturnModel::Normal { mean, std_dev },
            &CancellationToken::new(),
        )
    }

    pub fn simulate_with(
        &self,
        model: &ReturnModel<'_>,
        token: &CancellationToken,
    ) -> Result<SimulationRun> {
        self.config.validate()?;
        let sampler = Sampler::new(model)?;
        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        let initial = self.config.initial_capital;
        let horizon = self.config.horizon;

        let paths = pool::generate_paths(&self.config, seed, token, |rng| {
            let mut capital = Vec::with_capacity(horizon + 1);
            capital.push(initial);
            let mut current = initial;
            for _ in 0..horizon {
                current = (current * (1.0 + sampler.draw(rng))).max(0.0);
                capital.push(current);
            }
            EquityPath::new(capital)
        })?;

        Ok(SimulationRun::new(
            paths,
            RunConfig {
                num_simulations: self.config.num_simulations,
                horizon,
                initial_capital: initial,
                seed,
                horizon_unit: HorizonUnit::Days,
                compounding: Compounding::Multiplicative,
                source_mean: model.mean()?,
            },
        ))
    }
}

/// A validated, ready-to-draw form of [`ReturnModel`].
enum Sampler<'a> {
    Empirical(&'a [f64]),
    Normal(Normal<f64>),
}

impl<'a> Sampler<'a> {
    fn new(model: &ReturnModel<'a>) -> Result<Self> {
        match *model {
            ReturnModel::Empirical(series) => {
                if series.is_empty() {
                    return Err(Error::InvalidConfiguration(
                        "return series is empty".to_string(),
                    ));
                }
                Ok(Sampler::Empirical(series.values()))
            }
            ReturnModel::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "invalid normal model (mean {mean}, std_dev {std_dev})"
                    )));
                }
                Normal::new(mean, std_dev)
                    .map(Sampler::Normal)
                    .map_err(|e| Error::InvalidConfiguration(e.to_string()))
            }
        }
    }

    fn draw(&self, rng: &mut ChaCha8Rng) -> f64 {
        match self {
            Sampler::Empirical(values) => values.choose(rng).copied().unwrap_or(0.0),
            Sampler::Normal(normal) => normal.sample(rng),
        }
    }
}
