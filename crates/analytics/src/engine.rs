use crate::metrics;
use crate::types::PerformanceReport;
use crate::{Error, Result};
use core_types::Trade;

/// The engine responsible for calculating performance metrics from trade data.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Calculates a full performance report from a set of closed trades.
    ///
    /// Fails with `EmptyInput` for an empty set; there is nothing to report.
    pub fn calculate(&self, trades: &[Trade]) -> Result<PerformanceReport> {
        if trades.is_empty() {
            return Err(Error::EmptyInput("performance report"));
        }
        let mut report = PerformanceReport::new();

        // --- Tier 1 Calculations ---

        // 1. Trade counts
        report.total_trades = trades.len() as u32;
        report.winning_trades = trades.iter().filter(|t| t.is_win()).count() as u32;
        report.losing_trades = trades.iter().filter(|t| t.is_loss()).count() as u32;

        // 2. Win Rate & Profit Factor
        report.win_rate = metrics::win_rate(trades)? * 100.0;
        report.profit_factor = metrics::profit_factor(trades)?;
        report.total_pnl = metrics::total_pnl(trades);

        // 3. Sharpe Ratio (per trade, on the pnl series)
        let pnls: Vec<f64> = trades.iter().map(Trade::pnl_f64).collect();
        report.sharpe_ratio = metrics::sharpe_like_ratio(&pnls)?;

        // --- Tier 2 Calculations ---

        report.gross_profit = metrics::gross_profit(trades);
        report.gross_loss = metrics::gross_loss(trades);
        report.avg_win = metrics::average_win(trades);
        report.avg_loss = metrics::average_loss(trades);
        report.max_drawdown = metrics::max_drawdown_absolute(trades);
        report.expectancy = metrics::expectancy(trades)?;

        let total_duration_secs: i64 = trades.iter().map(|t| t.duration().num_seconds()).sum();
        report.avg_trade_duration_secs = total_duration_secs as f64 / trades.len() as f64;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn report_combines_all_metrics() {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 15, 0).unwrap();
        let trades: Vec<Trade> = [dec!(200), dec!(-100), dec!(300), dec!(-100)]
            .into_iter()
            .enumerate()
            .map(|(i, pnl)| {
                let entry = start + Duration::hours(i as i64);
                Trade::new(entry, entry + Duration::minutes(30), "NIFTY", pnl, "ema").unwrap()
            })
            .collect();

        let report = AnalyticsEngine::new().calculate(&trades).unwrap();
        assert_eq!(report.total_trades, 4);
        assert_eq!(report.winning_trades, 2);
        assert_eq!(report.losing_trades, 2);
        assert_eq!(report.win_rate, 50.0);
        assert_eq!(report.total_pnl, dec!(300));
        assert_eq!(report.profit_factor, 2.5);
        assert_eq!(report.max_drawdown, dec!(100));
        assert_eq!(report.avg_trade_duration_secs, 1800.0);
        assert!(report.sharpe_ratio > 0.0);
    }

    #[test]
    fn empty_trades_are_rejected() {
        assert_eq!(
            AnalyticsEngine::new().calculate(&[]),
            Err(Error::EmptyInput("performance report"))
        );
    }
}
