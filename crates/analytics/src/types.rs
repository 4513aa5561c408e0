// In crates/analytics/src/types.rs

use crate::Error;
use crate::metrics;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Per-strategy performance figures computed from a trade collection.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct PerformanceReport {
    // Tier 1 Metrics
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    /// Percentage in [0, 100].
    pub win_rate: f64,
    pub total_pnl: Decimal,
    pub profit_factor: f64,
    pub sharpe_ratio: f64,

    // Tier 2 Metrics
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    /// Largest decline of the cumulative pnl curve (currency, non-negative).
    pub max_drawdown: Decimal,
    pub expectancy: Decimal,
    pub avg_trade_duration_secs: f64,
}

impl PerformanceReport {
    /// Creates a new, empty report with zero values.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A numeric column of the comparison table that rows can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    TotalTrades,
    WinningTrades,
    LosingTrades,
    WinRate,
    TotalPnl,
    ProfitFactor,
    SharpeRatio,
    GrossProfit,
    GrossLoss,
    AvgWin,
    AvgLoss,
    MaxDrawdown,
    Expectancy,
    AvgTradeDurationSecs,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::TotalTrades,
        Column::WinningTrades,
        Column::LosingTrades,
        Column::WinRate,
        Column::TotalPnl,
        Column::ProfitFactor,
        Column::SharpeRatio,
        Column::GrossProfit,
        Column::GrossLoss,
        Column::AvgWin,
        Column::AvgLoss,
        Column::MaxDrawdown,
        Column::Expectancy,
        Column::AvgTradeDurationSecs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::TotalTrades => "total_trades",
            Column::WinningTrades => "winning_trades",
            Column::LosingTrades => "losing_trades",
            Column::WinRate => "win_rate",
            Column::TotalPnl => "total_pnl",
            Column::ProfitFactor => "profit_factor",
            Column::SharpeRatio => "sharpe_ratio",
            Column::GrossProfit => "gross_profit",
            Column::GrossLoss => "gross_loss",
            Column::AvgWin => "avg_win",
            Column::AvgLoss => "avg_loss",
            Column::MaxDrawdown => "max_drawdown",
            Column::Expectancy => "expectancy",
            Column::AvgTradeDurationSecs => "avg_trade_duration_secs",
        }
    }

    /// Extracts this column from a report as `f64` for sorting.
    pub fn value(self, report: &PerformanceReport) -> f64 {
        let decimal = metrics::decimal_to_f64;
        match self {
            Column::TotalTrades => report.total_trades as f64,
            Column::WinningTrades => report.winning_trades as f64,
            Column::LosingTrades => report.losing_trades as f64,
            Column::WinRate => report.win_rate,
            Column::TotalPnl => decimal(report.total_pnl),
            Column::ProfitFactor => report.profit_factor,
            Column::SharpeRatio => report.sharpe_ratio,
            Column::GrossProfit => decimal(report.gross_profit),
            Column::GrossLoss => decimal(report.gross_loss),
            Column::AvgWin => decimal(report.avg_win),
            Column::AvgLoss => decimal(report.avg_loss),
            Column::MaxDrawdown => decimal(report.max_drawdown),
            Column::Expectancy => decimal(report.expectancy),
            Column::AvgTradeDurationSecs => report.avg_trade_duration_secs,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Column::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| Error::UnknownColumn(s.to_string()))
    }
}

/// Outcome of a two-sample t-test between two strategies' pnl series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatisticalTest {
    pub strategy1: String,
    pub strategy2: String,
    pub mean_pnl_1: f64,
    pub mean_pnl_2: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub is_significant: bool,
    pub cohens_d: f64,
    pub better_strategy: String,
    /// `(1 - p) * 100` when significant, otherwise 0.
    pub confidence: f64,
}
