use chrono::{Duration, TimeZone, Utc};
use core_types::{ReturnSeries, Trade};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use simulator::{PathSimulator, SimulationConfig, TradeResampler};

/// 252 daily returns from N(0.001, 0.02), rescaled so the sample moments are
/// exactly the population ones.
fn daily_returns() -> ReturnSeries {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let normal = Normal::new(0.001, 0.02).unwrap();
    let raw: Vec<f64> = (0..252).map(|_| normal.sample(&mut rng)).collect();

    let mean = raw.iter().sum::<f64>() / raw.len() as f64;
    let std = (raw.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / raw.len() as f64).sqrt();
    ReturnSeries::new(raw.iter().map(|r| 0.001 + (r - mean) / std * 0.02).collect()).unwrap()
}

#[test]
fn positive_drift_returns_are_mostly_profitable() {
    let config = SimulationConfig::new(10_000, 252, 100_000.0).with_seed(42);
    let run = PathSimulator::new(config).simulate(&daily_returns()).unwrap();
    let stats = run.calculate_statistics().unwrap();

    assert_eq!(run.paths().len(), 10_000);
    assert!(run.paths().iter().all(|p| p.len() == 253));
    assert!(stats.probability_profit > 50.0, "{}", stats.probability_profit);
    assert!(stats.terminal_percentiles.p50 > 100_000.0);

    let p = stats.terminal_percentiles;
    assert!(p.p5 <= p.p25 && p.p25 <= p.p50 && p.p50 <= p.p75 && p.p75 <= p.p95);
    for value in [
        stats.probability_profit,
        stats.prob_gain_10,
        stats.prob_gain_20,
        stats.prob_loss_10,
        stats.prob_loss_20,
    ] {
        assert!((0.0..=100.0).contains(&value));
    }
}

#[test]
fn normal_model_agrees_with_bootstrap_direction() {
    let config = SimulationConfig::new(2_000, 252, 100_000.0).with_seed(9);
    let run = PathSimulator::new(config).simulate_normal(0.001, 0.02).unwrap();
    let stats = run.calculate_statistics().unwrap();
    assert!(stats.probability_profit > 50.0);
}

#[test]
fn resampled_mean_converges_to_expected_terminal() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap();
    let trades: Vec<Trade> = (0..50)
        .map(|i| {
            let pnl = Decimal::from((i % 7) * 40 - 100);
            let entry = start + Duration::hours(i);
            Trade::new(entry, entry + Duration::minutes(30), "NIFTY", pnl, "orb").unwrap()
        })
        .collect();
    let pnls: Vec<f64> = trades.iter().map(Trade::pnl_f64).collect();
    let total: f64 = pnls.iter().sum();
    let mean = total / 50.0;
    let std = (pnls.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / 50.0).sqrt();

    let initial = 10_000.0;
    let num_simulations = 5_000;
    let config = SimulationConfig::new(num_simulations, 100, initial).with_seed(11);
    let run = TradeResampler::new(config).resample(&trades).unwrap();
    let stats = run.calculate_statistics().unwrap();

    // 100 draws from 50 trades: twice the historical total on average.
    let expected = initial + 2.0 * total;
    assert!((run.expected_terminal() - expected).abs() < 1e-6);

    let standard_error = std * 100f64.sqrt() / (num_simulations as f64).sqrt();
    let gap = (stats.mean_final_equity - expected).abs();
    // Seed 11 lands about 1.6 standard errors from the expectation.
    assert!(gap < 2.0 * standard_error, "gap {gap} vs se {standard_error}");
}
