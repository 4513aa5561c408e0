// In crates/simulator/src/resampler.rs

use crate::cancel::CancellationToken;
use crate::config::SimulationConfig;
use crate::pool;
use crate::types::{Compounding, EquityPath, HorizonUnit, RunConfig, SimulationRun};
use crate::{Error, Result};
use analytics::metrics;
use core_types::Trade;
use rand::Rng;

/// Resamples historical trade pnl with replacement to measure sequencing
/// risk. `config.horizon` is the number of synthetic trades per path, and
/// each path accumulates pnl additively from the initial capital. A path
/// whose equity reaches zero is ruined and stays at zero.
#[derive(Debug, Clone)]
pub struct TradeResampler {
    config: SimulationConfig,
}

impl TradeResampler {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn resample(&self, trades: &[Trade]) -> Result<SimulationRun> {
        self.resample_with_cancel(trades, &CancellationToken::new())
    }

    pub fn resample_with_cancel(
        &self,
        trades: &[Trade],
        token: &CancellationToken,
    ) -> Result<SimulationRun> {
        let pnls: Vec<f64> = trades.iter().map(Trade::pnl_f64).collect();
        self.run(&pnls, token)
    }

    pub fn resample_pnls(&self, pnls: &[f64]) -> Result<SimulationRun> {
        self.run(pnls, &CancellationToken::new())
    }

    fn run(&self, pnls: &[f64], token: &CancellationToken) -> Result<SimulationRun> {
        self.config.validate()?;
        if pnls.is_empty() {
            return Err(Error::InsufficientData(
                "no historical trades to resample".to_string(),
            ));
        }
        metrics::ensure_finite(pnls, "trade pnl")?;

        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        let initial = self.config.initial_capital;
        let num_trades = self.config.horizon;

        let paths = pool::generate_paths(&self.config, seed, token, |rng| {
            let mut equity = Vec::with_capacity(num_trades + 1);
            equity.push(initial);
            let mut current = initial;
            for _ in 0..num_trades {
                let pnl = pnls[rng.gen_range(0..pnls.len())];
                if current > 0.0 {
                    current = (current + pnl).max(0.0);
                }
                equity.push(current);
            }
            EquityPath::new(equity)
        })?;

        Ok(SimulationRun::new(
            paths,
            RunConfig {
                num_simulations: self.config.num_simulations,
                horizon: num_trades,
                initial_capital: initial,
                seed,
                horizon_unit: HorizonUnit::Trades,
                compounding: Compounding::Additive,
                source_mean: metrics::mean(pnls)?,
            },
        ))
    }
}
