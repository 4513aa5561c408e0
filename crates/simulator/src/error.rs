// In crates/simulator/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Simulation was cancelled before completion")]
    Cancelled,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Analytics(#[from] analytics::Error),

    #[error(transparent)]
    Data(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
