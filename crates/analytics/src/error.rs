// In crates/analytics/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Cannot compute {0} of an empty collection")]
    EmptyInput(&'static str),

    #[error("Non-finite value encountered in {0}")]
    NonFiniteValue(&'static str),

    #[error("Percentile level {0} is outside [0, 100]")]
    InvalidPercentile(f64),

    #[error("A strategy named '{0}' is already registered")]
    DuplicateName(String),

    #[error("No strategies have been registered for comparison")]
    EmptyRegistry,

    #[error("No strategy named '{0}' is registered")]
    UnknownStrategy(String),

    #[error("Unknown comparison column '{0}'")]
    UnknownColumn(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid analyzer configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
