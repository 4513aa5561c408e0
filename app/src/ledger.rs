// In app/src/ledger.rs

//! CSV input for the CLI: closed-trade ledgers and return series.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use core_types::{ReturnSeries, Trade};
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TradeRow {
    entry_time: String,
    exit_time: String,
    symbol: String,
    pnl: Decimal,
    strategy: String,
}

#[derive(Debug, Deserialize)]
struct ReturnRow {
    #[serde(rename = "return")]
    value: f64,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("Failed to parse timestamp: {raw}"))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Reads `entry_time,exit_time,symbol,pnl,strategy` rows (RFC 3339 times).
pub fn read_trades<R: Read>(reader: R) -> Result<Vec<Trade>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut trades = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row: TradeRow = result.with_context(|| format!("Failed to parse CSV row {line}"))?;
        let trade = Trade::new(
            parse_timestamp(&row.entry_time)?,
            parse_timestamp(&row.exit_time)?,
            row.symbol,
            row.pnl,
            row.strategy,
        )
        .with_context(|| format!("Invalid trade on line {line}"))?;
        trades.push(trade);
    }

    Ok(trades)
}

/// Reads a one-column CSV with a `return` header of fractional returns.
pub fn read_returns<R: Read>(reader: R) -> Result<ReturnSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let values = csv_reader
        .deserialize()
        .enumerate()
        .map(|(index, result)| {
            let row: ReturnRow =
                result.with_context(|| format!("Failed to parse CSV row {}", index + 2))?;
            Ok(row.value)
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(ReturnSeries::new(values)?)
}

pub fn load_trades(path: &Path) -> Result<Vec<Trade>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let trades = read_trades(file)?;
    tracing::info!(path = ?path, trades = trades.len(), "Loaded trade ledger.");
    Ok(trades)
}

pub fn load_returns(path: &Path) -> Result<ReturnSeries> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let series = read_returns(file)?;
    tracing::info!(path = ?path, periods = series.len(), "Loaded return series.");
    Ok(series)
}

/// Splits a ledger by strategy tag, in order of first appearance.
pub fn group_by_strategy(trades: &[Trade]) -> Vec<(String, Vec<Trade>)> {
    trades
        .iter()
        .map(Trade::strategy)
        .unique()
        .map(|name| {
            let own = trades
                .iter()
                .filter(|t| t.strategy() == name)
                .cloned()
                .collect();
            (name.to_string(), own)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const LEDGER: &str = "\
entry_time,exit_time,symbol,pnl,strategy
2024-03-04T09:20:00Z,2024-03-04T10:05:00Z,NIFTY,1250.50,orb
2024-03-04T09:25:00+05:30,2024-03-04T11:00:00+05:30,BANKNIFTY,-300,vwap
2024-03-05T09:20:00Z,2024-03-05T09:50:00Z,NIFTY,410,orb
";

    #[test]
    fn parses_ledger_rows() {
        let trades = read_trades(LEDGER.as_bytes()).unwrap();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].pnl(), dec!(1250.50));
        assert_eq!(trades[1].symbol(), "BANKNIFTY");
        assert_eq!(trades[1].entry_time().to_rfc3339(), "2024-03-04T03:55:00+00:00");
    }

    #[test]
    fn groups_in_first_seen_order() {
        let trades = read_trades(LEDGER.as_bytes()).unwrap();
        let groups = group_by_strategy(&trades);
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["orb", "vwap"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn reports_the_offending_line() {
        let bad = "entry_time,exit_time,symbol,pnl,strategy\n\
                   2024-03-04T10:00:00Z,2024-03-04T09:00:00Z,NIFTY,5,orb\n";
        let err = read_trades(bad.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_bad_timestamps() {
        let bad = "entry_time,exit_time,symbol,pnl,strategy\nyesterday,today,NIFTY,5,orb\n";
        assert!(read_trades(bad.as_bytes()).is_err());
    }

    #[test]
    fn parses_returns() {
        let series = read_returns("return\n0.01\n-0.005\n0.002\n".as_bytes()).unwrap();
        assert_eq!(series.values(), &[0.01, -0.005, 0.002]);
    }

    #[test]
    fn return_below_minus_one_is_rejected() {
        assert!(read_returns("return\n-1.5\n".as_bytes()).is_err());
    }
}
