// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Non-finite value in field '{field}'")]
    NonFiniteValue { field: &'static str },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
