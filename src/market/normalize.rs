//! Candle normalization.
//!
//! Upstreams return positional candle rows that differ in column order,
//! timestamp unit (milliseconds vs seconds) and number encoding (JSON strings
//! vs JSON numbers). Everything here reshapes them into [`Candle`] without
//! resampling: candle boundaries stay exactly as returned.

use crate::market::error::UpstreamError;
use crate::models::Candle;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Raw timestamps at or above this value are milliseconds.
///
/// In seconds this bound is year 2286, so it never misreads a real
/// seconds-based timestamp.
pub const MILLIS_THRESHOLD: u64 = 10_000_000_000;

/// Column positions of one provider's candle rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Open time column.
    pub time: usize,
    /// Open price column.
    pub open: usize,
    /// High price column.
    pub high: usize,
    /// Low price column.
    pub low: usize,
    /// Close price column.
    pub close: usize,
    /// Volume column.
    pub volume: usize,
}

impl RowLayout {
    /// `[openTimeMs, "open", "high", "low", "close", "volume", closeTimeMs, ...]`
    pub const DIRECT_EXCHANGE: Self = Self {
        time: 0,
        open: 1,
        high: 2,
        low: 3,
        close: 4,
        volume: 5,
    };

    /// `[timestampSec, open, high, low, close, volume]`
    pub const INDEXER: Self = Self::DIRECT_EXCHANGE;

    fn width(&self) -> usize {
        [
            self.time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// Converts a raw timestamp to seconds.
#[must_use]
pub fn normalize_timestamp(raw: u64) -> u64 {
    if raw >= MILLIS_THRESHOLD {
        raw / 1000
    } else {
        raw
    }
}

/// Parses a decimal from its textual form, accepting exponent notation.
fn parse_decimal(text: &str) -> Result<Decimal, UpstreamError> {
    let text = text.trim();
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).or_else(|e| round_scientific(text).ok_or(e))
    } else {
        Decimal::from_str(text)
    };
    parsed.map_err(|e| UpstreamError::Decode(format!("invalid decimal {text:?}: {e}")))
}

/// Parses a negative-exponent value whose scale exceeds `Decimal`'s 28
/// fractional digits, rounding it to 28 places.
fn round_scientific(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(['e', 'E'])?;
    let exponent: i64 = exponent.parse().ok()?;
    if exponent >= 0 {
        return None;
    }

    let mut value = Decimal::from_str(mantissa).ok()?;
    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value = value.checked_div(Decimal::TEN)?;
    }
    Some(value)
}

/// Renders a price or volume as a canonical decimal string.
///
/// Trailing zeros are stripped and exponent notation is expanded, so the
/// output is stable under repeated normalization.
pub fn normalize_decimal(value: &Value) -> Result<String, UpstreamError> {
    let decimal = match value {
        Value::String(s) => parse_decimal(s)?,
        Value::Number(n) => parse_decimal(&n.to_string())?,
        other => {
            return Err(UpstreamError::Decode(format!(
                "expected decimal, got {other}"
            )));
        }
    };
    Ok(decimal.normalize().to_string())
}

fn parse_timestamp(value: &Value) -> Result<u64, UpstreamError> {
    let raw = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    raw.map(normalize_timestamp)
        .ok_or_else(|| UpstreamError::Decode(format!("invalid timestamp {value}")))
}

/// Normalizes one positional candle row.
pub fn normalize_row(row: &[Value], layout: RowLayout) -> Result<Candle, UpstreamError> {
    if row.len() < layout.width() {
        return Err(UpstreamError::Decode(format!(
            "candle row has {} fields, expected at least {}",
            row.len(),
            layout.width()
        )));
    }

    Ok(Candle {
        open_time: parse_timestamp(&row[layout.time])?,
        open: normalize_decimal(&row[layout.open])?,
        high: normalize_decimal(&row[layout.high])?,
        low: normalize_decimal(&row[layout.low])?,
        close: normalize_decimal(&row[layout.close])?,
        volume: normalize_decimal(&row[layout.volume])?,
    })
}

/// Orders candles by open time, keeping the last occurrence of a duplicate.
fn into_ascending(candles: impl IntoIterator<Item = Candle>) -> Vec<Candle> {
    candles
        .into_iter()
        .map(|c| (c.open_time, c))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}

/// Normalizes a provider's rows into ascending candles.
pub fn normalize_rows(rows: &[Vec<Value>], layout: RowLayout) -> Result<Vec<Candle>, UpstreamError> {
    let candles = rows
        .iter()
        .map(|row| normalize_row(row, layout))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(into_ascending(candles))
}

/// Applies the shared time window and limit to ascending candles.
///
/// Bounds are inclusive on open time. With a start bound the earliest
/// `limit` candles are kept, otherwise the latest `limit`.
#[must_use]
pub fn apply_window(
    candles: Vec<Candle>,
    start_time: Option<u64>,
    end_time: Option<u64>,
    limit: usize,
) -> Vec<Candle> {
    let mut candles: Vec<Candle> = candles
        .into_iter()
        .filter(|c| start_time.is_none_or(|start| c.open_time >= start))
        .filter(|c| end_time.is_none_or(|end| c.open_time <= end))
        .collect();

    if candles.len() > limit {
        if start_time.is_some() {
            candles.truncate(limit);
        } else {
            let excess = candles.len() - limit;
            candles.drain(..excess);
        }
    }
    candles
}
