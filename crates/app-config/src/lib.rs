// In crates/app-config/src/lib.rs

use config::{Config, Environment, File, Map};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, Settings, SimulationSettings, TimeAnalysisSettings};

/// Loads the application settings from the `config/` directory of the
/// working directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Layered configuration loading:
/// 1. `base.toml` in `dir`.
/// 2. An environment-specific file (e.g., `development.toml`), if present.
/// 3. Environment variables such as `APP__SIMULATION__SEED=7` or
///    `APP__APP__LOG_LEVEL=debug`.
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    load_layered(dir, None)
}

/// `vars` replaces the process environment for the last layer when given.
fn load_layered(dir: &Path, vars: Option<Map<String, String>>) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::from(dir.join("base")))
        .add_source(File::from(dir.join(&environment)).required(false))
        // The separator `__` also follows the `APP` prefix.
        .add_source(Environment::with_prefix("APP").separator("__").source(vars))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
