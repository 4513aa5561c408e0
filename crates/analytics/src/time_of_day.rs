// In crates/analytics/src/time_of_day.rs

use crate::{metrics, report};
use crate::{Error, Result};
use chrono::{Datelike, FixedOffset, Timelike, Weekday};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketGranularity {
    #[default]
    Hour,
    HalfHour,
}

impl FromStr for BucketGranularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "hour" => Ok(Self::Hour),
            "half_hour" => Ok(Self::HalfHour),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown bucket granularity '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAnalysisConfig {
    pub granularity: BucketGranularity,
    /// Buckets with fewer trades are never reported as "best".
    pub min_bucket_trades: usize,
    /// Shift applied to entry times before bucketing, e.g. 330 for IST.
    pub utc_offset_minutes: i32,
}

impl Default for TimeAnalysisConfig {
    fn default() -> Self {
        Self {
            granularity: BucketGranularity::Hour,
            min_bucket_trades: 5,
            utc_offset_minutes: 0,
        }
    }
}

/// Start of an intra-day slot (`minute` is 0 for hourly buckets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeSlot {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A (weekday, time slot) pair. Ordered Monday first, then by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    weekday: u8,
    pub slot: TimeSlot,
}

impl BucketKey {
    pub fn new(weekday: Weekday, slot: TimeSlot) -> Self {
        Self {
            weekday: weekday.num_days_from_monday() as u8,
            slot,
        }
    }

    pub fn weekday(&self) -> Weekday {
        weekday_from_index(self.weekday)
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday(), self.slot)
    }
}

fn weekday_from_index(index: u8) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Aggregate figures for one bucket.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BucketStats {
    pub trade_count: usize,
    pub winning_trades: usize,
    /// Percentage in [0, 100].
    pub win_rate: f64,
    pub total_pnl: Decimal,
    pub mean_pnl: Decimal,
}

impl BucketStats {
    fn record(&mut self, trade: &Trade) {
        self.trade_count += 1;
        if trade.is_win() {
            self.winning_trades += 1;
        }
        self.total_pnl += trade.pnl();
        self.win_rate = self.winning_trades as f64 / self.trade_count as f64 * 100.0;
        self.mean_pnl = self.total_pnl / Decimal::from(self.trade_count);
    }

    fn merge(&mut self, other: &BucketStats) {
        self.trade_count += other.trade_count;
        self.winning_trades += other.winning_trades;
        self.total_pnl += other.total_pnl;
        if self.trade_count > 0 {
            self.win_rate = self.winning_trades as f64 / self.trade_count as f64 * 100.0;
            self.mean_pnl = self.total_pnl / Decimal::from(self.trade_count);
        }
    }
}

/// Buckets trades by weekday and time of day of their entry.
///
/// Only buckets that received at least one trade exist; a market with fixed
/// hours fills a handful of the 168 (or 336) possible buckets.
#[derive(Debug, Clone)]
pub struct TimeOfDayAnalyzer {
    config: TimeAnalysisConfig,
    buckets: BTreeMap<BucketKey, BucketStats>,
}

impl TimeOfDayAnalyzer {
    pub fn new(trades: &[Trade], config: TimeAnalysisConfig) -> Result<Self> {
        if config.min_bucket_trades == 0 {
            return Err(Error::InvalidConfiguration(
                "min_bucket_trades must be at least 1".to_string(),
            ));
        }
        let offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "utc offset of {} minutes is out of range",
                    config.utc_offset_minutes
                ))
            })?;

        let mut buckets: BTreeMap<BucketKey, BucketStats> = BTreeMap::new();
        for trade in trades {
            let local = trade.entry_time().with_timezone(&offset);
            let minute = match config.granularity {
                BucketGranularity::Hour => 0,
                BucketGranularity::HalfHour => (local.minute() / 30 * 30) as u8,
            };
            let slot = TimeSlot {
                hour: local.hour() as u8,
                minute,
            };
            buckets
                .entry(BucketKey::new(local.weekday(), slot))
                .or_default()
                .record(trade);
        }

        Ok(Self { config, buckets })
    }

    pub fn config(&self) -> &TimeAnalysisConfig {
        &self.config
    }

    /// Every non-empty bucket, Monday first.
    pub fn buckets(&self) -> &BTreeMap<BucketKey, BucketStats> {
        &self.buckets
    }

    /// The bucket with the highest total pnl among buckets holding at least
    /// `min_bucket_trades` trades. Ties go to the earliest bucket in the week.
    pub fn find_best_trading_times(&self) -> Result<(BucketKey, &BucketStats)> {
        let mut best: Option<(BucketKey, &BucketStats)> = None;
        for (key, stats) in self.qualifying(&self.buckets) {
            if best.is_none_or(|(_, b)| stats.total_pnl > b.total_pnl) {
                best = Some((*key, stats));
            }
        }

        best.ok_or_else(|| {
            Error::InsufficientData(format!(
                "no time bucket has at least {} trades",
                self.config.min_bucket_trades
            ))
        })
    }

    /// Aggregates across weekdays, one entry per time slot.
    pub fn analyze_by_hour(&self) -> BTreeMap<TimeSlot, BucketStats> {
        let mut slots: BTreeMap<TimeSlot, BucketStats> = BTreeMap::new();
        for (key, stats) in &self.buckets {
            slots.entry(key.slot).or_default().merge(stats);
        }
        slots
    }

    /// Aggregates across time slots, one entry per weekday, Monday first.
    pub fn analyze_by_day(&self) -> Vec<(Weekday, BucketStats)> {
        let mut days: BTreeMap<u8, BucketStats> = BTreeMap::new();
        for (key, stats) in &self.buckets {
            days.entry(key.weekday).or_default().merge(stats);
        }
        days.into_iter()
            .map(|(day, stats)| (weekday_from_index(day), stats))
            .collect()
    }

    /// Time slots with the highest mean pnl, among slots meeting the trade
    /// count threshold.
    pub fn best_hours(&self, top_n: usize) -> Vec<TimeSlot> {
        let mut ranked = self.ranked_slots();
        ranked.truncate(top_n);
        ranked.into_iter().map(|(slot, _)| slot).collect()
    }

    /// Time slots with the lowest mean pnl, among slots meeting the trade
    /// count threshold.
    pub fn worst_hours(&self, bottom_n: usize) -> Vec<TimeSlot> {
        let mut ranked = self.ranked_slots();
        ranked.reverse();
        ranked.truncate(bottom_n);
        ranked.into_iter().map(|(slot, _)| slot).collect()
    }

    fn ranked_slots(&self) -> Vec<(TimeSlot, f64)> {
        let by_hour = self.analyze_by_hour();
        let mut ranked: Vec<(TimeSlot, f64)> = self
            .qualifying(&by_hour)
            .map(|(slot, stats)| (*slot, metrics::decimal_to_f64(stats.mean_pnl)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    fn qualifying<'a, K>(
        &self,
        map: &'a BTreeMap<K, BucketStats>,
    ) -> impl Iterator<Item = (&'a K, &'a BucketStats)> {
        let threshold = self.config.min_bucket_trades;
        map.iter().filter(move |(_, s)| s.trade_count >= threshold)
    }

    /// Text report with per-slot, per-day and best-bucket sections.
    pub fn generate_report(&self, top_n: usize) -> String {
        report::render_time_analysis(self, top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn trade_at(entry: DateTime<Utc>, pnl: Decimal) -> Trade {
        Trade::new(entry, entry + Duration::minutes(20), "NIFTY", pnl, "orb").unwrap()
    }

    // 2024-01-01 is a Monday.
    fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let trades = vec![trade_at(monday(9, 15), dec!(10)), trade_at(monday(9, 45), dec!(-4))];
        let analyzer = TimeOfDayAnalyzer::new(&trades, TimeAnalysisConfig::default()).unwrap();

        assert_eq!(analyzer.buckets().len(), 1);
        let (key, stats) = analyzer.buckets().iter().next().unwrap();
        assert_eq!(key.weekday(), Weekday::Mon);
        assert_eq!(key.slot, TimeSlot { hour: 9, minute: 0 });
        assert_eq!(stats.trade_count, 2);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.total_pnl, dec!(6));
        assert_eq!(stats.mean_pnl, dec!(3));
    }

    #[test]
    fn half_hour_granularity_splits_the_hour() {
        let trades = vec![trade_at(monday(9, 15), dec!(10)), trade_at(monday(9, 45), dec!(-4))];
        let config = TimeAnalysisConfig {
            granularity: BucketGranularity::HalfHour,
            ..Default::default()
        };
        let analyzer = TimeOfDayAnalyzer::new(&trades, config).unwrap();
        let slots: Vec<_> = analyzer.buckets().keys().map(|k| k.slot.to_string()).collect();
        assert_eq!(slots, ["09:00", "09:30"]);
    }

    #[test]
    fn utc_offset_moves_trades_into_local_time() {
        // 03:45 UTC on Monday is 09:15 in UTC+05:30.
        let trades = vec![trade_at(monday(3, 45), dec!(1))];
        let config = TimeAnalysisConfig {
            utc_offset_minutes: 330,
            ..Default::default()
        };
        let analyzer = TimeOfDayAnalyzer::new(&trades, config).unwrap();
        let key = analyzer.buckets().keys().next().unwrap();
        assert_eq!(key.slot.hour, 9);

        // 23:30 UTC Sunday is Monday morning in UTC+05:30.
        let sunday = Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap();
        let analyzer = TimeOfDayAnalyzer::new(&[trade_at(sunday, dec!(1))], config).unwrap();
        assert_eq!(analyzer.buckets().keys().next().unwrap().weekday(), Weekday::Mon);
    }

    #[test]
    fn best_bucket_respects_the_threshold() {
        let mut trades = vec![trade_at(monday(14, 0), dec!(10000))];
        for day in 0..5 {
            trades.push(trade_at(monday(10, 5) + Duration::weeks(day), dec!(100)));
        }
        let analyzer = TimeOfDayAnalyzer::new(&trades, TimeAnalysisConfig::default()).unwrap();

        let (key, stats) = analyzer.find_best_trading_times().unwrap();
        assert_eq!(key, BucketKey::new(Weekday::Mon, TimeSlot { hour: 10, minute: 0 }));
        assert_eq!(stats.total_pnl, dec!(500));
    }

    #[test]
    fn no_qualifying_bucket_is_an_error() {
        let trades = vec![trade_at(monday(10, 0), dec!(5))];
        let analyzer = TimeOfDayAnalyzer::new(&trades, TimeAnalysisConfig::default()).unwrap();
        assert!(matches!(
            analyzer.find_best_trading_times(),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn hour_and_day_rollups() {
        let mut trades = Vec::new();
        for week in 0..5 {
            let base = monday(0, 0) + Duration::weeks(week);
            trades.push(trade_at(base + Duration::hours(9), dec!(50)));
            trades.push(trade_at(base + Duration::hours(11), dec!(-20)));
            trades.push(trade_at(base + Duration::days(1) + Duration::hours(9), dec!(30)));
        }
        let analyzer = TimeOfDayAnalyzer::new(&trades, TimeAnalysisConfig::default()).unwrap();

        let by_hour = analyzer.analyze_by_hour();
        assert_eq!(by_hour.len(), 2);
        assert_eq!(by_hour[&TimeSlot { hour: 9, minute: 0 }].trade_count, 10);
        assert_eq!(by_hour[&TimeSlot { hour: 9, minute: 0 }].mean_pnl, dec!(40));

        let by_day = analyzer.analyze_by_day();
        assert_eq!(by_day.len(), 2);
        assert_eq!(by_day[0].0, Weekday::Mon);
        assert_eq!(by_day[0].1.total_pnl, dec!(150));
        assert_eq!(by_day[1].0, Weekday::Tue);

        assert_eq!(analyzer.best_hours(1), vec![TimeSlot { hour: 9, minute: 0 }]);
        assert_eq!(analyzer.worst_hours(1), vec![TimeSlot { hour: 11, minute: 0 }]);
    }

    #[test]
    fn invalid_configuration() {
        let zero = TimeAnalysisConfig {
            min_bucket_trades: 0,
            ..Default::default()
        };
        assert!(TimeOfDayAnalyzer::new(&[], zero).is_err());

        let far = TimeAnalysisConfig {
            utc_offset_minutes: 24 * 60,
            ..Default::default()
        };
        assert!(TimeOfDayAnalyzer::new(&[], far).is_err());

        for minutes in [i32::MAX, i32::MIN, 40_000_000] {
            let huge = TimeAnalysisConfig {
                utc_offset_minutes: minutes,
                ..Default::default()
            };
            assert!(matches!(
                TimeOfDayAnalyzer::new(&[], huge),
                Err(Error::InvalidConfiguration(_))
            ));
        }
        assert!("quarter".parse::<BucketGranularity>().is_err());
        assert_eq!("half-hour".parse::<BucketGranularity>().unwrap(), BucketGranularity::HalfHour);
    }
}
