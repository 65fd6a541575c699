//! Daily time series parsing.
//!
//! Translates the provider's `TIME_SERIES_DAILY` payload into the latest
//! `QuoteSnapshot` and a newest-first `RecentSeries` window.
//!
//! The provider keys each bar by ISO date and uses numeric-prefixed field
//! names (`"1. open"`, `"4. close"`, ...). Those names are the provider's wire
//! format and are mapped here without interpretation.

use crate::change::ChangeIndicator;
use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Payload key holding the dated bar mapping.
pub const TIME_SERIES_KEY: &str = "Time Series (Daily)";

/// Maximum number of bars kept in `RecentSeries`.
pub const RECENT_SERIES_LEN: usize = 10;

/// Header line of the CSV export.
pub const CSV_HEADER: &str = "Date,Open,High,Low,Close,Volume";

/// One trading day's OHLCV record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

impl DailyBar {
    /// Render the bar as one CSV row (no escaping, all fields are numeric or ISO dates).
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.date, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

/// Raw bar as delivered by the provider (all values string-encoded).
#[derive(Debug, Deserialize)]
struct RawDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl RawDailyBar {
    fn into_bar(self, date: NaiveDate) -> Result<DailyBar> {
        Ok(DailyBar {
            date,
            open: parse_price(&self.open, date, "open")?,
            high: parse_price(&self.high, date, "high")?,
            low: parse_price(&self.low, date, "low")?,
            close: parse_price(&self.close, date, "close")?,
            volume: self
                .volume
                .trim()
                .parse::<u64>()
                .map_err(|e| CoreError::InvalidField {
                    date: date.to_string(),
                    field: "volume",
                    reason: e.to_string(),
                })?,
        })
    }
}

fn parse_price(raw: &str, date: NaiveDate, field: &'static str) -> Result<Decimal> {
    Decimal::from_str(raw.trim())
        .map(|d| d.normalize())
        .map_err(|e| CoreError::InvalidField {
            date: date.to_string(),
            field,
            reason: e.to_string(),
        })
}

/// Latest bar plus the previous session's close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    #[serde(flatten)]
    pub latest: DailyBar,
    /// Close of the second-most-recent bar; `None` when only one bar exists.
    pub previous_close: Option<Decimal>,
}

impl QuoteSnapshot {
    pub fn date(&self) -> NaiveDate {
        self.latest.date
    }

    pub fn close(&self) -> Decimal {
        self.latest.close
    }

    /// Day-over-day change, if a previous close is known.
    pub fn change(&self) -> Option<ChangeIndicator> {
        ChangeIndicator::compute(self.latest.close, self.previous_close)
    }
}

/// Up to `RECENT_SERIES_LEN` bars, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSeries(Vec<DailyBar>);

impl RecentSeries {
    /// Build from bars already ordered newest first. Extra bars are dropped.
    pub fn from_newest_first(mut bars: Vec<DailyBar>) -> Self {
        bars.truncate(RECENT_SERIES_LEN);
        Self(bars)
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Export as CSV, newest row first.
    ///
    /// Returns `None` for an empty series so callers produce no file at all.
    pub fn to_csv(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }

        let mut lines = Vec::with_capacity(self.0.len() + 1);
        lines.push(CSV_HEADER.to_string());
        lines.extend(self.0.iter().map(DailyBar::csv_row));
        Some(lines.join("\n"))
    }
}

/// Result of parsing one provider payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSeries {
    pub snapshot: QuoteSnapshot,
    pub series: RecentSeries,
}

/// Parse a `TIME_SERIES_DAILY` payload.
///
/// Returns `CoreError::MissingTimeSeries` when the payload has no (or an
/// empty) dated mapping, or when no key in it is an ISO date. Keys that are
/// not dates are skipped. Only the newest `RECENT_SERIES_LEN` bars are
/// decoded; malformed bars older than that window are ignored.
pub fn parse_daily_series(payload: &serde_json::Value) -> Result<ParsedSeries> {
    let entries = payload
        .get(TIME_SERIES_KEY)
        .and_then(|v| v.as_object())
        .filter(|m| !m.is_empty())
        .ok_or(CoreError::MissingTimeSeries)?;

    let mut dated: Vec<_> = entries
        .iter()
        .filter_map(|(key, value)| match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
            Ok(date) => Some((date, value)),
            Err(e) => {
                debug!(key = %key, error = %e, "Skipping non-date series key");
                None
            }
        })
        .collect();

    // Newest first
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let bars = dated
        .into_iter()
        .take(RECENT_SERIES_LEN)
        .map(|(date, value)| {
            let raw: RawDailyBar = serde_json::from_value(value.clone())?;
            raw.into_bar(date)
        })
        .collect::<Result<Vec<_>>>()?;

    let series = RecentSeries::from_newest_first(bars);
    let latest = series
        .bars()
        .first()
        .cloned()
        .ok_or(CoreError::MissingTimeSeries)?;
    let previous_close = series.bars().get(1).map(|bar| bar.close);

    Ok(ParsedSeries {
        snapshot: QuoteSnapshot {
            latest,
            previous_close,
        },
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::Direction;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn bar_json(close: &str) -> serde_json::Value {
        json!({
            "1. open": "10.0000",
            "2. high": "12.0000",
            "3. low": "9.0000",
            "4. close": close,
            "5. volume": "100"
        })
    }

    fn payload_with_days(days: u32) -> serde_json::Value {
        let mut series = serde_json::Map::new();
        for day in 1..=days {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(day as u64);
            series.insert(date.to_string(), bar_json(&format!("{day}.00")));
        }
        json!({ TIME_SERIES_KEY: series })
    }

    #[test]
    fn test_two_day_payload() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-02": {"1. open":"10","2. high":"12","3. low":"9","4. close":"11","5. volume":"100"},
                "2024-01-01": {"1. open":"9","2. high":"10","3. low":"8","4. close":"9.5","5. volume":"80"}
            }
        });

        let parsed = parse_daily_series(&payload).unwrap();
        let snapshot = &parsed.snapshot;
        assert_eq!(snapshot.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(snapshot.close(), dec!(11));
        assert_eq!(snapshot.previous_close, Some(dec!(9.5)));

        let change = snapshot.change().unwrap();
        assert_eq!(change.delta_text(), "1.50");
        assert_eq!(change.percent_text(), "15.79%");
        assert_eq!(change.direction, Direction::Up);
        assert_eq!(parsed.series.len(), 2);
    }

    #[test]
    fn test_single_entry_has_no_previous_close() {
        let parsed = parse_daily_series(&payload_with_days(1)).unwrap();
        assert_eq!(parsed.snapshot.previous_close, None);
        assert!(parsed.snapshot.change().is_none());
        assert_eq!(parsed.series.len(), 1);
    }

    #[test]
    fn test_previous_close_is_second_newest() {
        let parsed = parse_daily_series(&payload_with_days(5)).unwrap();
        // Newest is day 5 (close 5), second newest day 4 (close 4)
        assert_eq!(parsed.snapshot.close(), dec!(5));
        assert_eq!(parsed.snapshot.previous_close, Some(dec!(4)));
    }

    #[test]
    fn test_series_capped_and_newest_first() {
        for days in [1u32, 3, 10, 11, 40] {
            let parsed = parse_daily_series(&payload_with_days(days)).unwrap();
            let bars = parsed.series.bars();
            assert_eq!(bars.len(), (days as usize).min(RECENT_SERIES_LEN));
            assert!(bars.windows(2).all(|w| w[0].date > w[1].date));
            assert_eq!(bars[0], parsed.snapshot.latest);
        }
    }

    #[test]
    fn test_missing_or_empty_series() {
        assert!(matches!(
            parse_daily_series(&json!({"Meta Data": {}})),
            Err(CoreError::MissingTimeSeries)
        ));
        assert!(matches!(
            parse_daily_series(&json!({ TIME_SERIES_KEY: {} })),
            Err(CoreError::MissingTimeSeries)
        ));
        assert!(matches!(
            parse_daily_series(&json!({ TIME_SERIES_KEY: [] })),
            Err(CoreError::MissingTimeSeries)
        ));
    }

    #[test]
    fn test_malformed_bar_is_error() {
        let payload = json!({
            TIME_SERIES_KEY: {
                "2024-01-02": {"1. open":"x","2. high":"12","3. low":"9","4. close":"11","5. volume":"100"}
            }
        });
        assert!(matches!(
            parse_daily_series(&payload),
            Err(CoreError::InvalidField { field: "open", .. })
        ));

        let payload = json!({ TIME_SERIES_KEY: { "yesterday": bar_json("1") } });
        assert!(matches!(
            parse_daily_series(&payload),
            Err(CoreError::MissingTimeSeries)
        ));
    }

    #[test]
    fn test_non_date_keys_are_skipped() {
        let mut payload = payload_with_days(12);
        let series = payload[TIME_SERIES_KEY].as_object_mut().unwrap();
        series.insert("1999-13-01".to_string(), bar_json("1"));
        series.insert("Meta".to_string(), json!("not a bar"));

        let parsed = parse_daily_series(&payload).unwrap();
        assert_eq!(parsed.series.len(), RECENT_SERIES_LEN);
        assert_eq!(parsed.snapshot.close(), dec!(12));
        assert_eq!(parsed.snapshot.previous_close, Some(dec!(11)));
    }

    #[test]
    fn test_malformed_bar_outside_window_is_ignored() {
        let mut payload = payload_with_days(11);
        // Oldest entry falls outside the 10-bar window
        payload[TIME_SERIES_KEY]["2024-01-02"] = json!({"1. open": "x"});

        let parsed = parse_daily_series(&payload).unwrap();
        assert_eq!(parsed.series.len(), RECENT_SERIES_LEN);
    }

    #[test]
    fn test_extreme_close_yields_no_change() {
        let payload = json!({
            TIME_SERIES_KEY: {
                "2024-01-02": bar_json("1000000000000000000000000000"),
                "2024-01-01": bar_json("1")
            }
        });

        let parsed = parse_daily_series(&payload).unwrap();
        assert_eq!(parsed.snapshot.previous_close, Some(dec!(1)));
        assert!(parsed.snapshot.change().is_none());
    }

    #[test]
    fn test_csv_export() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-01": {"1. open":"9.0000","2. high":"10.0000","3. low":"8.0000","4. close":"9.5000","5. volume":"80"},
                "2024-01-02": {"1. open":"10.0000","2. high":"12.0000","3. low":"9.0000","4. close":"11.0000","5. volume":"100"}
            }
        });
        let parsed = parse_daily_series(&payload).unwrap();

        let csv = parsed.series.to_csv().unwrap();
        assert_eq!(
            csv,
            "Date,Open,High,Low,Close,Volume\n2024-01-02,10,12,9,11,100\n2024-01-01,9,10,8,9.5,80"
        );
    }

    #[test]
    fn test_csv_export_empty_series() {
        assert_eq!(RecentSeries::default().to_csv(), None);
    }
}
