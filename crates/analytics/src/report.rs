// In crates/analytics/src/report.rs

//! Plain-text renderers for comparison and time-of-day results. Pure
//! functions: they only format what they are given.

use crate::comparator::{ComparisonTable, SortOrder};
use crate::time_of_day::TimeOfDayAnalyzer;
use crate::types::{Column, StatisticalTest};
use core_types::format::{banner, money, pct, ratio, rule};
use crate::metrics::decimal_to_f64 as dec;
use rust_decimal::Decimal;

pub fn render_comparison(table: &ComparisonTable) -> String {
    let mut lines = vec![banner("STRATEGY COMPARISON REPORT")];
    lines.push(format!("\nSTRATEGIES COMPARED: {}", table.len()));
    lines.push(String::new());

    for row in &table.rows {
        let report = &row.report;
        lines.push(row.strategy.to_uppercase());
        lines.push(rule('-'));
        lines.push(format!("   Total Trades: {}", report.total_trades));
        lines.push(format!("   Win Rate: {}", pct(report.win_rate)));
        lines.push(format!("   Total P&L: {}", money(dec(report.total_pnl))));
        lines.push(format!("   Profit Factor: {}", ratio(report.profit_factor)));
        lines.push(format!("   Sharpe Ratio: {}", ratio(report.sharpe_ratio)));
        lines.push(format!("   Max Drawdown: {}", money(dec(report.max_drawdown))));
        lines.push(format!("   Expectancy: {}", money(dec(report.expectancy))));
        lines.push(String::new());
    }

    lines.push("TOP STRATEGIES:".to_string());
    lines.push(rule('-'));
    if let Some(best) = table.top_by(Column::TotalPnl) {
        lines.push(format!(
            "   By Total P&L: {} ({})",
            best.strategy,
            money(dec(best.report.total_pnl))
        ));
    }
    if let Some(best) = table.top_by(Column::SharpeRatio) {
        lines.push(format!(
            "   By Sharpe Ratio: {} ({})",
            best.strategy,
            ratio(best.report.sharpe_ratio)
        ));
    }
    lines.push(String::new());

    lines.push("RANKING BY SHARPE RATIO:".to_string());
    lines.push(rule('-'));
    for (i, row) in table
        .ranked_by(Column::SharpeRatio, SortOrder::Descending)
        .iter()
        .enumerate()
    {
        lines.push(format!("   {}. {}: {}", i + 1, row.strategy, ratio(row.report.sharpe_ratio)));
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines.join("\n")
}

pub fn render_statistical_test(test: &StatisticalTest) -> String {
    let mut lines = vec![banner("STATISTICAL TEST")];
    lines.push(format!("   {} vs {}", test.strategy1, test.strategy2));
    lines.push(format!(
        "   Mean P&L: {} vs {}",
        money(test.mean_pnl_1),
        money(test.mean_pnl_2)
    ));
    lines.push(format!("   t-statistic: {:.2}", test.t_statistic));
    lines.push(format!("   p-value: {:.4}", test.p_value));
    lines.push(format!("   Cohen's d: {:.2}", test.cohens_d));
    lines.push(format!("   Significant: {}", if test.is_significant { "yes" } else { "no" }));
    lines.push(format!("   Better Strategy: {}", test.better_strategy));
    lines.push(format!("   Confidence: {}", pct(test.confidence)));
    lines.push(rule('='));
    lines.join("\n")
}

pub fn render_time_analysis(analyzer: &TimeOfDayAnalyzer, top_n: usize) -> String {
    let mut lines = vec![banner("TIME-OF-DAY ANALYSIS")];

    let by_hour = analyzer.analyze_by_hour();
    if !by_hour.is_empty() {
        lines.push("\nPERFORMANCE BY HOUR:".to_string());
        lines.push(rule('-'));
        for (slot, stats) in &by_hour {
            let marker = if stats.mean_pnl > Decimal::ZERO { "+" } else { "-" };
            lines.push(format!(
                "{marker} {slot} | Trades: {:>3} | Avg P&L: {:>10} | Win Rate: {}",
                stats.trade_count,
                money(dec(stats.mean_pnl)),
                pct(stats.win_rate)
            ));
        }
    }

    let best = analyzer.best_hours(top_n);
    if !best.is_empty() {
        let slots: Vec<String> = best.iter().map(ToString::to_string).collect();
        lines.push(format!("\nBEST HOURS: {}", slots.join(", ")));
    }
    let worst = analyzer.worst_hours(top_n);
    if !worst.is_empty() {
        let slots: Vec<String> = worst.iter().map(ToString::to_string).collect();
        lines.push(format!("WORST HOURS: {}", slots.join(", ")));
    }

    let by_day = analyzer.analyze_by_day();
    if !by_day.is_empty() {
        lines.push("\nPERFORMANCE BY DAY OF WEEK:".to_string());
        lines.push(rule('-'));
        for (day, stats) in &by_day {
            let marker = if stats.mean_pnl > Decimal::ZERO { "+" } else { "-" };
            lines.push(format!(
                "{marker} {:<9} | Trades: {:>3} | Total P&L: {:>12} | Avg: {:>10}",
                format!("{day:?}"),
                stats.trade_count,
                money(dec(stats.total_pnl)),
                money(dec(stats.mean_pnl))
            ));
        }
    }

    lines.push("\nBEST TRADING TIME:".to_string());
    lines.push(rule('-'));
    match analyzer.find_best_trading_times() {
        Ok((key, stats)) => lines.push(format!(
            "   {key} | Trades: {} | Total P&L: {} | Win Rate: {}",
            stats.trade_count,
            money(dec(stats.total_pnl)),
            pct(stats.win_rate)
        )),
        Err(e) => lines.push(format!("   {e}")),
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines.join("\n")
}
