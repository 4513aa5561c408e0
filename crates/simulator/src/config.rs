use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Parameters shared by both simulators.
///
/// `horizon` counts periods for the path simulator and trades for the
/// resampler. `worker_threads == 0` sizes the pool to the available cores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub num_simulations: usize,
    pub horizon: usize,
    pub initial_capital: f64,
    pub seed: Option<u64>,
    pub batch_size: usize,
    pub worker_threads: usize,
}

impl SimulationConfig {
    pub fn new(num_simulations: usize, horizon: usize, initial_capital: f64) -> Self {
        Self {
            num_simulations,
            horizon,
            initial_capital,
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
            worker_threads: 0,
        }
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_simulations < 1 {
            return Err(Error::InvalidConfiguration(
                "num_simulations must be at least 1".to_string(),
            ));
        }
        if self.horizon < 1 {
            return Err(Error::InvalidConfiguration(
                "horizon must be at least 1".to_string(),
            ));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        if self.batch_size < 1 {
            return Err(Error::InvalidConfiguration(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(10_000, 252, 100_000.0)
    }
}
