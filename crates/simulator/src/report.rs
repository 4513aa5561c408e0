// In crates/simulator/src/report.rs

use crate::stats::StatisticsSnapshot;
use crate::types::{Compounding, RunConfig};
use core_types::format::{banner, money, pct, rule};

pub fn render_statistics(stats: &StatisticsSnapshot, config: &RunConfig) -> String {
    let title = match config.compounding {
        Compounding::Multiplicative => "MONTE CARLO SIMULATION RESULTS",
        Compounding::Additive => "TRADE RESAMPLING RESULTS",
    };
    let mut lines = vec![banner(title)];

    lines.push("\nCONFIGURATION:".to_string());
    lines.push(rule('-'));
    lines.push(format!("   Simulations: {}", stats.num_simulations));
    lines.push(format!(
        "   Horizon: {} {}",
        stats.horizon,
        stats.horizon_unit.label()
    ));
    lines.push(format!("   Initial Capital: {}", money(stats.initial_capital)));
    lines.push(format!("   Seed: {}", config.seed));

    lines.push("\nPROBABILITIES:".to_string());
    lines.push(rule('-'));
    lines.push(format!("   Profit: {}", pct(stats.probability_profit)));
    lines.push(format!("   Gain > 10%: {}", pct(stats.prob_gain_10)));
    lines.push(format!("   Gain > 20%: {}", pct(stats.prob_gain_20)));
    lines.push(format!("   Loss > 10%: {}", pct(stats.prob_loss_10)));
    lines.push(format!("   Loss > 20%: {}", pct(stats.prob_loss_20)));

    lines.push("\nRETURNS:".to_string());
    lines.push(rule('-'));
    lines.push(format!("   Expected Return: {}", pct(stats.expected_return)));
    lines.push(format!("   Median Return: {}", pct(stats.median_return)));
    lines.push(format!("   Best Case: {}", pct(stats.best_return)));
    lines.push(format!("   Worst Case: {}", pct(stats.worst_return)));

    lines.push("\nFINAL EQUITY:".to_string());
    lines.push(rule('-'));
    lines.push(format!("   Mean: {}", money(stats.mean_final_equity)));
    lines.push(format!("   Median: {}", money(stats.median_final_equity)));
    lines.push(format!(
        "   Expected (no sampling): {}",
        money(config.expected_terminal())
    ));

    lines.push("\nPERCENTILES:".to_string());
    lines.push(rule('-'));
    let returns = stats.return_percentiles.levels();
    for ((level, equity), (_, ret)) in stats.terminal_percentiles.levels().into_iter().zip(returns) {
        lines.push(format!(
            "   {:>2}th: {:>16} ({})",
            level,
            money(equity),
            pct(ret)
        ));
    }

    lines.push("\nDRAWDOWN:".to_string());
    lines.push(rule('-'));
    lines.push(format!("   Mean Max Drawdown: {}", pct(stats.mean_max_drawdown)));
    lines.push(format!("   Worst Max Drawdown: {}", pct(stats.worst_max_drawdown)));

    lines.push(String::new());
    lines.push(rule('='));
    lines.join("\n")
}
