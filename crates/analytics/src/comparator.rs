// In crates/analytics/src/comparator.rs

use crate::engine::AnalyticsEngine;
use crate::metrics;
use crate::report;
use crate::types::{Column, PerformanceReport, StatisticalTest};
use crate::{Error, Result};
use core_types::Trade;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// A named trade collection registered with the comparator.
#[derive(Debug, Clone)]
pub struct StrategyRecord {
    pub name: String,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// One row of the comparison table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonRow {
    pub strategy: String,
    /// Position in registration order, used to break ranking ties.
    pub registration_index: usize,
    #[serde(flatten)]
    pub report: PerformanceReport,
}

/// Per-strategy metric rows in registration order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Rows sorted by `column`. The sort is stable and rows are stored in
    /// registration order, so ties keep registration order.
    pub fn ranked_by(&self, column: Column, order: SortOrder) -> Vec<&ComparisonRow> {
        let mut ranked: Vec<&ComparisonRow> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            let (a, b) = (column.value(&a.report), column.value(&b.report));
            match order {
                SortOrder::Ascending => a.total_cmp(&b),
                SortOrder::Descending => b.total_cmp(&a),
            }
        });
        ranked
    }

    /// The best row by `column` (highest value).
    pub fn top_by(&self, column: Column) -> Option<&ComparisonRow> {
        self.ranked_by(column, SortOrder::Descending).into_iter().next()
    }

    pub fn row(&self, strategy: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.strategy == strategy)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compares any number of named trade collections.
///
/// Names are unique: registering a name twice fails with `DuplicateName`
/// rather than silently replacing the earlier trades.
#[derive(Debug, Default)]
pub struct StrategyComparator {
    strategies: Vec<StrategyRecord>,
    engine: AnalyticsEngine,
}

impl StrategyComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy for comparison.
    pub fn add_strategy(&mut self, name: impl Into<String>, trades: Vec<Trade>) -> Result<()> {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(Error::DuplicateName(name));
        }
        if trades.is_empty() {
            return Err(Error::EmptyInput("strategy trades"));
        }

        tracing::info!(strategy = %name, trades = trades.len(), "Added strategy for comparison.");
        self.strategies.push(StrategyRecord { name, trades });
        Ok(())
    }

    pub fn strategies(&self) -> &[StrategyRecord] {
        &self.strategies
    }

    fn find(&self, name: &str) -> Option<&StrategyRecord> {
        self.strategies.iter().find(|s| s.name == name)
    }

    /// Computes one row of metrics per registered strategy.
    pub fn compare_all(&self) -> Result<ComparisonTable> {
        if self.strategies.is_empty() {
            return Err(Error::EmptyRegistry);
        }

        let rows = self
            .strategies
            .iter()
            .enumerate()
            .map(|(registration_index, record)| {
                Ok(ComparisonRow {
                    strategy: record.name.clone(),
                    registration_index,
                    report: self.engine.calculate(&record.trades)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ComparisonTable { rows })
    }

    /// Two-sample Student t-test (pooled variance) on the pnl of two
    /// registered strategies.
    pub fn run_statistical_test(&self, strategy1: &str, strategy2: &str) -> Result<StatisticalTest> {
        let first = self
            .find(strategy1)
            .ok_or_else(|| Error::UnknownStrategy(strategy1.to_string()))?;
        let second = self
            .find(strategy2)
            .ok_or_else(|| Error::UnknownStrategy(strategy2.to_string()))?;

        let pnls1: Vec<f64> = first.trades.iter().map(Trade::pnl_f64).collect();
        let pnls2: Vec<f64> = second.trades.iter().map(Trade::pnl_f64).collect();
        let (n1, n2) = (pnls1.len() as f64, pnls2.len() as f64);

        let degrees_of_freedom = n1 + n2 - 2.0;
        if degrees_of_freedom < 1.0 {
            return Err(Error::InsufficientData(
                "a t-test needs at least three trades across both strategies".to_string(),
            ));
        }

        let mean1 = metrics::mean(&pnls1)?;
        let mean2 = metrics::mean(&pnls2)?;
        let std1 = metrics::std_dev(&pnls1)?;
        let std2 = metrics::std_dev(&pnls2)?;

        // Sums of squared deviations, pooled over n1 + n2 - 2.
        let sum_sq1 = std1.powi(2) * n1;
        let sum_sq2 = std2.powi(2) * n2;
        let pooled_variance = (sum_sq1 + sum_sq2) / degrees_of_freedom;
        if pooled_variance <= 0.0 {
            return Err(Error::InsufficientData(
                "both strategies have constant pnl; the t statistic is undefined".to_string(),
            ));
        }

        let standard_error = (pooled_variance * (1.0 / n1 + 1.0 / n2)).sqrt();
        let t_statistic = (mean1 - mean2) / standard_error;

        let distribution = StudentsT::new(0.0, 1.0, degrees_of_freedom)
            .map_err(|e| Error::InsufficientData(e.to_string()))?;
        let p_value = (2.0 * (1.0 - distribution.cdf(t_statistic.abs()))).clamp(0.0, 1.0);

        // Effect size uses the population deviations.
        let pooled_std = ((std1.powi(2) + std2.powi(2)) / 2.0).sqrt();
        let cohens_d = if pooled_std > 0.0 { (mean1 - mean2) / pooled_std } else { 0.0 };

        let is_significant = p_value < SIGNIFICANCE_LEVEL;
        let better_strategy = if mean1 > mean2 { strategy1 } else { strategy2 };

        Ok(StatisticalTest {
            strategy1: strategy1.to_string(),
            strategy2: strategy2.to_string(),
            mean_pnl_1: mean1,
            mean_pnl_2: mean2,
            t_statistic,
            p_value,
            is_significant,
            cohens_d,
            better_strategy: better_strategy.to_string(),
            confidence: if is_significant { (1.0 - p_value) * 100.0 } else { 0.0 },
        })
    }

    /// Renders the comparison as text, naming the leader by total pnl and the
    /// leader by sharpe ratio separately.
    pub fn generate_comparison_report(&self) -> Result<String> {
        let table = self.compare_all()?;
        Ok(report::render_comparison(&table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ledger(pnls: &[Decimal], strategy: &str) -> Vec<Trade> {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| {
                let entry = start + Duration::days(i as i64);
                Trade::new(entry, entry + Duration::hours(1), "NIFTY", *pnl, strategy).unwrap()
            })
            .collect()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut comparator = StrategyComparator::new();
        comparator.add_strategy("ema", ledger(&[dec!(10)], "ema")).unwrap();
        let err = comparator.add_strategy("ema", ledger(&[dec!(20)], "ema")).unwrap_err();
        assert_eq!(err, Error::DuplicateName("ema".to_string()));
        // The first registration is untouched.
        assert_eq!(comparator.strategies()[0].trades[0].pnl(), dec!(10));
    }

    #[test]
    fn empty_registry_cannot_be_compared() {
        let comparator = StrategyComparator::new();
        assert_eq!(comparator.compare_all(), Err(Error::EmptyRegistry));
        assert_eq!(comparator.generate_comparison_report(), Err(Error::EmptyRegistry));
    }

    #[test]
    fn empty_trade_list_is_rejected() {
        let mut comparator = StrategyComparator::new();
        assert!(matches!(
            comparator.add_strategy("idle", Vec::new()),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let mut comparator = StrategyComparator::new();
        comparator.add_strategy("first", ledger(&[dec!(5), dec!(5)], "first")).unwrap();
        comparator.add_strategy("second", ledger(&[dec!(10)], "second")).unwrap();
        comparator.add_strategy("third", ledger(&[dec!(4), dec!(6)], "third")).unwrap();

        let table = comparator.compare_all().unwrap();
        let names: Vec<_> = table
            .ranked_by(Column::TotalPnl, SortOrder::Descending)
            .iter()
            .map(|r| r.strategy.as_str())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);

        let by_trades: Vec<_> = table
            .ranked_by(Column::TotalTrades, SortOrder::Ascending)
            .iter()
            .map(|r| r.strategy.as_str())
            .collect();
        assert_eq!(by_trades, ["second", "first", "third"]);
    }

    #[test]
    fn infinite_profit_factor_ranks_first() {
        let mut comparator = StrategyComparator::new();
        comparator.add_strategy("mixed", ledger(&[dec!(50), dec!(-10)], "mixed")).unwrap();
        comparator.add_strategy("flawless", ledger(&[dec!(1)], "flawless")).unwrap();

        let table = comparator.compare_all().unwrap();
        let top = table.top_by(Column::ProfitFactor).unwrap();
        assert_eq!(top.strategy, "flawless");
        assert_eq!(top.report.profit_factor, f64::INFINITY);
    }

    #[test]
    fn t_test_detects_a_clear_difference() {
        let strong: Vec<Decimal> = (0..40).map(|i| Decimal::from(100 + (i % 5))).collect();
        let weak: Vec<Decimal> = (0..40).map(|i| Decimal::from(-100 - (i % 5))).collect();

        let mut comparator = StrategyComparator::new();
        comparator.add_strategy("strong", ledger(&strong, "strong")).unwrap();
        comparator.add_strategy("weak", ledger(&weak, "weak")).unwrap();

        let test = comparator.run_statistical_test("strong", "weak").unwrap();
        assert!(test.t_statistic > 0.0);
        assert!(test.is_significant);
        assert!(test.p_value < 1e-6);
        assert!(test.confidence > 99.0);
        assert_eq!(test.better_strategy, "strong");
        assert!(test.cohens_d > 1.0);
    }

    #[test]
    fn t_test_on_identical_samples_is_not_significant() {
        let pnls = [dec!(10), dec!(-20), dec!(30), dec!(-5)];
        let mut comparator = StrategyComparator::new();
        comparator.add_strategy("a", ledger(&pnls, "a")).unwrap();
        comparator.add_strategy("b", ledger(&pnls, "b")).unwrap();

        let test = comparator.run_statistical_test("a", "b").unwrap();
        assert_eq!(test.t_statistic, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-9);
        assert!(!test.is_significant);
        assert_eq!(test.confidence, 0.0);
    }

    #[test]
    fn t_test_errors() {
        let mut comparator = StrategyComparator::new();
        comparator.add_strategy("flat", ledger(&[dec!(5), dec!(5)], "flat")).unwrap();
        comparator.add_strategy("also_flat", ledger(&[dec!(5)], "also_flat")).unwrap();

        assert_eq!(
            comparator.run_statistical_test("flat", "missing"),
            Err(Error::UnknownStrategy("missing".to_string()))
        );
        assert!(matches!(
            comparator.run_statistical_test("flat", "also_flat"),
            Err(Error::InsufficientData(_))
        ));
    }
}
