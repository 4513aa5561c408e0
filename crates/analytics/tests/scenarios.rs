use analytics::{
    BucketGranularity, BucketKey, Column, Error, SortOrder, StrategyComparator,
    TimeAnalysisConfig, TimeOfDayAnalyzer,
};
use analytics::time_of_day::TimeSlot;
use chrono::{Duration, TimeZone, Utc, Weekday};
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn base_trades() -> Vec<Trade> {
    let start = Utc.with_ymd_and_hms(2024, 2, 5, 9, 20, 0).unwrap();
    [dec!(1200), dec!(-450), dec!(800), dec!(-300), dec!(650), dec!(-150)]
        .into_iter()
        .enumerate()
        .map(|(i, pnl)| {
            let entry = start + Duration::days(i as i64);
            Trade::new(entry, entry + Duration::hours(2), "NIFTY", pnl, "base").unwrap()
        })
        .collect()
}

#[test]
fn scaled_strategies_rank_by_total_pnl() {
    let a = base_trades();
    let b: Vec<Trade> = a.iter().map(|t| t.scaled(dec!(1.2))).collect();
    let c: Vec<Trade> = a.iter().map(|t| t.scaled(dec!(0.8))).collect();

    let mut comparator = StrategyComparator::new();
    comparator.add_strategy("A", a).unwrap();
    comparator.add_strategy("B", b).unwrap();
    comparator.add_strategy("C", c).unwrap();

    let table = comparator.compare_all().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.row("A").unwrap().report.total_pnl, dec!(1750));
    assert!(table.row("B").unwrap().report.total_pnl > table.row("A").unwrap().report.total_pnl);
    assert!(table.row("C").unwrap().report.total_pnl < table.row("A").unwrap().report.total_pnl);

    let order: Vec<&str> = table
        .ranked_by(Column::TotalPnl, SortOrder::default())
        .iter()
        .map(|row| row.strategy.as_str())
        .collect();
    assert_eq!(order, ["B", "A", "C"]);

    // Scaling leaves the win rate untouched, so registration order decides.
    let by_win_rate: Vec<&str> = table
        .ranked_by(Column::WinRate, SortOrder::Descending)
        .iter()
        .map(|row| row.strategy.as_str())
        .collect();
    assert_eq!(by_win_rate, ["A", "B", "C"]);
}

#[test]
fn registration_errors() {
    let mut comparator = StrategyComparator::new();
    assert_eq!(comparator.compare_all().unwrap_err(), Error::EmptyRegistry);

    comparator.add_strategy("A", base_trades()).unwrap();
    assert!(matches!(
        comparator.add_strategy("A", base_trades()),
        Err(Error::DuplicateName(name)) if name == "A"
    ));
}

fn concentrated_trades() -> Vec<Trade> {
    // 200 trades, all entered on Wednesdays between 14:00 and 14:59 UTC.
    let first_wednesday = Utc.with_ymd_and_hms(2024, 1, 3, 14, 0, 0).unwrap();
    (0..200i64)
        .map(|i| {
            let entry = first_wednesday + Duration::weeks(i % 20) + Duration::minutes(i % 60);
            let pnl = Decimal::from(if i % 3 == 0 { -40 } else { 90 });
            Trade::new(entry, entry + Duration::minutes(15), "BANKNIFTY", pnl, "orb").unwrap()
        })
        .collect()
}

#[test]
fn concentrated_hour_is_the_best_bucket() {
    let trades = concentrated_trades();
    let analyzer = TimeOfDayAnalyzer::new(&trades, TimeAnalysisConfig::default()).unwrap();

    let (key, stats) = analyzer.find_best_trading_times().unwrap();
    assert_eq!(key, BucketKey::new(Weekday::Wed, TimeSlot { hour: 14, minute: 0 }));
    assert_eq!(stats.trade_count, 200);
    assert_eq!(analyzer.buckets().len(), 1);
}

#[test]
fn offset_and_half_hour_buckets() {
    let trades = concentrated_trades();
    let config = TimeAnalysisConfig {
        granularity: BucketGranularity::HalfHour,
        min_bucket_trades: 5,
        utc_offset_minutes: 330,
    };
    let analyzer = TimeOfDayAnalyzer::new(&trades, config).unwrap();

    // 14:00-14:59 UTC is 19:30-20:29 IST: two half-hour slots.
    let slots: Vec<TimeSlot> = analyzer.analyze_by_hour().into_keys().collect();
    assert_eq!(
        slots,
        [TimeSlot { hour: 19, minute: 30 }, TimeSlot { hour: 20, minute: 0 }]
    );
    assert!(analyzer
        .buckets()
        .keys()
        .all(|key| key.weekday() == Weekday::Wed));
}

#[test]
fn threshold_excludes_thin_buckets() {
    let trades: Vec<Trade> = concentrated_trades().into_iter().take(3).collect();
    let analyzer = TimeOfDayAnalyzer::new(&trades, TimeAnalysisConfig::default()).unwrap();
    assert!(matches!(
        analyzer.find_best_trading_times(),
        Err(Error::InsufficientData(_))
    ));
}
