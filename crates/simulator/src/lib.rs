// In crates/simulator/src/lib.rs

//! Monte Carlo simulation of equity paths.
//!
//! * [`PathSimulator`] compounds returns drawn from a return series.
//! * [`TradeResampler`] sums trade pnl drawn with replacement from a ledger.
//!
//! Both produce an immutable [`SimulationRun`]; statistics are a pure
//! reduction over it via [`SimulationRun::calculate_statistics`].

pub mod cancel;
pub mod config;
pub mod error;
pub mod path;
mod pool;
pub mod report;
pub mod resampler;
pub mod stats;
pub mod types;

pub use cancel::CancellationToken;
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use path::{PathSimulator, ReturnModel};
pub use resampler::TradeResampler;
pub use stats::{PercentileSummary, StatisticsSnapshot};
pub use types::{Compounding, EquityPath, HorizonUnit, RunConfig, SimulationRun};
