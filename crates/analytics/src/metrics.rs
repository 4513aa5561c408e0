// In crates/analytics/src/metrics.rs

//! Stateless statistical primitives shared by the simulators, the comparator
//! and the time-of-day analyzer.
//!
//! Degenerate-but-valid inputs have defined results:
//! * `profit_factor` is `+inf` when there are winners and no losers, and `0.0`
//!   when there are neither winners nor losers.
//! * `sharpe_like_ratio` is `0.0` when the series has zero standard deviation.
//!
//! Empty inputs and NaN/infinite values are errors, never coerced to zero.

use crate::{Error, Result};
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// The percentile levels reported by every summary in this workspace.
pub const STANDARD_LEVELS: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Fails with `NonFiniteValue` if any value is NaN or infinite.
pub fn ensure_finite(values: &[f64], context: &'static str) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFiniteValue(context));
    }
    Ok(())
}

fn ensure_trades(trades: &[Trade], context: &'static str) -> Result<()> {
    if trades.is_empty() {
        return Err(Error::EmptyInput(context));
    }
    Ok(())
}

/// Fraction of trades with pnl > 0, in [0, 1].
pub fn win_rate(trades: &[Trade]) -> Result<f64> {
    ensure_trades(trades, "win rate")?;
    let wins = trades.iter().filter(|t| t.is_win()).count();
    Ok(wins as f64 / trades.len() as f64)
}

/// Sum of all positive pnl.
pub fn gross_profit(trades: &[Trade]) -> Decimal {
    trades.iter().filter(|t| t.is_win()).map(|t| t.pnl()).sum()
}

/// Absolute sum of all negative pnl.
pub fn gross_loss(trades: &[Trade]) -> Decimal {
    trades
        .iter()
        .filter(|t| t.is_loss())
        .map(|t| t.pnl())
        .sum::<Decimal>()
        .abs()
}

pub fn total_pnl(trades: &[Trade]) -> Decimal {
    trades.iter().map(|t| t.pnl()).sum()
}

/// Lossy view of a currency amount for ranking and formatting. A failed
/// conversion yields NaN so it cannot pass for a real zero.
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Gross profit over gross loss magnitude.
pub fn profit_factor(trades: &[Trade]) -> Result<f64> {
    ensure_trades(trades, "profit factor")?;
    let gross_profit = gross_profit(trades);
    let gross_loss = gross_loss(trades);

    if gross_loss > Decimal::ZERO {
        (gross_profit / gross_loss)
            .to_f64()
            .ok_or(Error::NonFiniteValue("profit factor"))
    } else if gross_profit > Decimal::ZERO {
        Ok(f64::INFINITY) // Pure profit
    } else {
        Ok(0.0)
    }
}

/// Mean winning pnl, zero when there are no winners.
pub fn average_win(trades: &[Trade]) -> Decimal {
    let wins = trades.iter().filter(|t| t.is_win()).count();
    if wins == 0 {
        return Decimal::ZERO;
    }
    gross_profit(trades) / Decimal::from(wins)
}

/// Mean losing pnl magnitude, zero when there are no losers.
pub fn average_loss(trades: &[Trade]) -> Decimal {
    let losses = trades.iter().filter(|t| t.is_loss()).count();
    if losses == 0 {
        return Decimal::ZERO;
    }
    gross_loss(trades) / Decimal::from(losses)
}

/// Expected pnl per trade: `win_rate * avg_win - (1 - win_rate) * avg_loss`.
pub fn expectancy(trades: &[Trade]) -> Result<Decimal> {
    let win_rate = win_rate(trades)?;
    let win_rate = Decimal::from_f64(win_rate).ok_or(Error::NonFiniteValue("win rate"))?;
    Ok(win_rate * average_win(trades) - (Decimal::ONE - win_rate) * average_loss(trades))
}

/// Largest peak-to-trough decline of the cumulative pnl curve, as a
/// non-negative currency amount. The curve starts at zero.
pub fn max_drawdown_absolute(trades: &[Trade]) -> Decimal {
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;
    for trade in trades {
        cumulative += trade.pnl();
        peak = peak.max(cumulative);
        max_drawdown = max_drawdown.max(peak - cumulative);
    }
    max_drawdown
}

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::EmptyInput("mean"));
    }
    ensure_finite(values, "mean")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Mean over (population) standard deviation of a pnl or return series.
///
/// This is a per-period figure; multiply by `sqrt(periods_per_year)` to
/// annualize. Returns `0.0` when the standard deviation is zero.
pub fn sharpe_like_ratio(series: &[f64]) -> Result<f64> {
    if series.is_empty() {
        return Err(Error::EmptyInput("sharpe ratio"));
    }
    let mean = mean(series)?;
    let std_dev = std_dev(series)?;
    if std_dev > 0.0 {
        Ok(mean / std_dev)
    } else {
        Ok(0.0)
    }
}

/// Largest fractional decline from any running peak to a later trough.
///
/// `0.0` for a non-decreasing path; `0.5` for a path that halves, whatever
/// happens afterwards. Peaks at or below zero are skipped since a fractional
/// decline from them is meaningless.
pub fn max_drawdown(equity_path: &[f64]) -> Result<f64> {
    if equity_path.is_empty() {
        return Err(Error::EmptyInput("max drawdown"));
    }
    ensure_finite(equity_path, "equity path")?;

    let mut peak = equity_path[0];
    let mut max_drawdown: f64 = 0.0;
    for &value in equity_path {
        peak = peak.max(value);
        if peak > 0.0 {
            max_drawdown = max_drawdown.max((peak - value) / peak);
        }
    }
    Ok(max_drawdown)
}

/// Linear-interpolated percentile of each requested level (0-100), using
/// the same interpolation as numpy's default.
pub fn percentiles(values: &[f64], levels: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::EmptyInput("percentiles"));
    }
    ensure_finite(values, "percentiles")?;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    levels
        .iter()
        .map(|&level| percentile_of_sorted(&sorted, level))
        .collect()
}

/// Same as [`percentiles`] for a slice that is already sorted ascending and
/// known to be finite.
pub fn percentile_of_sorted(sorted: &[f64], level: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(Error::EmptyInput("percentiles"));
    }
    if !(0.0..=100.0).contains(&level) {
        return Err(Error::InvalidPercentile(level));
    }

    let rank = level / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}
