// In crates/app-config/src/types.rs

use crate::{Error, Result};
use analytics::{BucketGranularity, TimeAnalysisConfig};
use serde::Deserialize;
use simulator::SimulationConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Defaults for both Monte Carlo simulators.
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub time_analysis: TimeAnalysisSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let level = self.app.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::InvalidSetting {
                field: "app.log_level",
                reason: format!("unknown level '{}'", self.app.log_level),
            });
        }
        if self.time_analysis.top_n == 0 {
            return Err(Error::InvalidSetting {
                field: "time_analysis.top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// Size of the simulation worker pool; 0 uses every core.
    #[serde(default)]
    pub worker_threads: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SimulationSettings {
    pub num_simulations: usize,
    /// Periods per path for the return simulator.
    pub horizon: usize,
    /// Synthetic trades per path for the resampler.
    pub num_trades: usize,
    pub initial_capital: f64,
    pub seed: Option<u64>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    simulator::config::DEFAULT_BATCH_SIZE
}

impl SimulationSettings {
    fn build(&self, horizon: usize, worker_threads: usize) -> SimulationConfig {
        let config = SimulationConfig::new(self.num_simulations, horizon, self.initial_capital)
            .with_batch_size(self.batch_size)
            .with_worker_threads(worker_threads);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Configuration for the return-path simulator.
    pub fn path_config(&self, worker_threads: usize) -> SimulationConfig {
        self.build(self.horizon, worker_threads)
    }

    /// Configuration for the trade resampler.
    pub fn resample_config(&self, worker_threads: usize) -> SimulationConfig {
        self.build(self.num_trades, worker_threads)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TimeAnalysisSettings {
    pub min_bucket_trades: usize,
    pub granularity: BucketGranularity,
    pub utc_offset_minutes: i32,
    /// How many slots the best/worst lists show.
    pub top_n: usize,
}

impl Default for TimeAnalysisSettings {
    fn default() -> Self {
        let analysis = TimeAnalysisConfig::default();
        Self {
            min_bucket_trades: analysis.min_bucket_trades,
            granularity: analysis.granularity,
            utc_offset_minutes: analysis.utc_offset_minutes,
            top_n: 3,
        }
    }
}

impl From<&TimeAnalysisSettings> for TimeAnalysisConfig {
    fn from(settings: &TimeAnalysisSettings) -> Self {
        Self {
            granularity: settings.granularity,
            min_bucket_trades: settings.min_bucket_trades,
            utc_offset_minutes: settings.utc_offset_minutes,
        }
    }
}
