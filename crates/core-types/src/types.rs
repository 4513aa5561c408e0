// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;

/// A single closed trade as recorded in the ledger.
///
/// Fields are private so a `Trade` can only be obtained through one of the
/// validating constructors and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    symbol: String,
    pnl: Decimal,
    strategy: String,
}

impl Trade {
    /// Creates a trade, rejecting inverted timestamps and blank symbols.
    pub fn new(
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
        symbol: impl Into<String>,
        pnl: Decimal,
        strategy: impl Into<String>,
    ) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(Error::InvalidTrade("symbol is blank".to_string()));
        }
        if entry_time > exit_time {
            return Err(Error::InvalidTrade(format!(
                "{symbol}: entry time {entry_time} is after exit time {exit_time}"
            )));
        }

        Ok(Self {
            entry_time,
            exit_time,
            symbol,
            pnl,
            strategy: strategy.into(),
        })
    }

    /// Same as [`Trade::new`] but takes a floating point pnl, which must be finite.
    pub fn from_f64(
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
        symbol: impl Into<String>,
        pnl: f64,
        strategy: impl Into<String>,
    ) -> Result<Self> {
        if !pnl.is_finite() {
            return Err(Error::NonFiniteValue { field: "pnl" });
        }
        let pnl = Decimal::from_f64(pnl)
            .ok_or_else(|| Error::InvalidTrade(format!("pnl {pnl} is out of range")))?;
        Self::new(entry_time, exit_time, symbol, pnl, strategy)
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn exit_time(&self) -> DateTime<Utc> {
        self.exit_time
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn pnl(&self) -> Decimal {
        self.pnl
    }

    /// The pnl as `f64`. Yields NaN only if the decimal cannot be represented,
    /// which downstream metrics report as an error.
    pub fn pnl_f64(&self) -> f64 {
        self.pnl.to_f64().unwrap_or(f64::NAN)
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }

    pub fn duration(&self) -> Duration {
        self.exit_time - self.entry_time
    }

    /// Returns a copy of this trade with the pnl multiplied by `factor`,
    /// e.g. to model a different position size.
    pub fn scaled(&self, factor: Decimal) -> Self {
        Self {
            pnl: self.pnl * factor,
            ..self.clone()
        }
    }
}

/// Per-period fractional returns (0.01 == +1%), in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Wraps a vector of returns. Every value must be finite and greater than -1
    /// (a return of -100% or worse has no meaning for compounding capital).
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.iter().any(|r| !r.is_finite()) {
            return Err(Error::NonFiniteValue { field: "return" });
        }
        if let Some(r) = values.iter().find(|r| **r <= -1.0) {
            return Err(Error::InvalidValue(format!(
                "return {r} would wipe out the account"
            )));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(Error::EmptyInput("return series"));
        }
        Ok(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> Result<f64> {
        let mean = self.mean()?;
        let variance = self
            .values
            .iter()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / self.values.len() as f64;
        Ok(variance.sqrt())
    }
}
