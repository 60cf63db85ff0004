//! CSV replay sources.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use tickflow_core::{Candle, DataError, Level1Field, Level1Update};

/// Candle record format.
#[derive(Debug, Deserialize)]
struct CandleRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: Decimal,
    #[serde(alias = "High", alias = "high")]
    high: Decimal,
    #[serde(alias = "Low", alias = "low")]
    low: Decimal,
    #[serde(alias = "Close", alias = "close")]
    close: Decimal,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Decimal,
}

/// Level-1 record format. Every field column is optional; absent
/// columns simply do not appear on the produced update.
#[derive(Debug, Deserialize)]
struct Level1Record {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Symbol", alias = "symbol")]
    symbol: String,
    #[serde(default)]
    best_bid_price: Option<Decimal>,
    #[serde(default)]
    best_bid_volume: Option<Decimal>,
    #[serde(default)]
    best_ask_price: Option<Decimal>,
    #[serde(default)]
    best_ask_volume: Option<Decimal>,
    #[serde(default)]
    last_trade_price: Option<Decimal>,
    #[serde(default)]
    last_trade_volume: Option<Decimal>,
}

/// CSV source for historical candles.
pub struct CandleCsvSource {
    path: PathBuf,
}

impl CandleCsvSource {
    /// Create a source for the given file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load all candles, sorted by open time.
    pub fn load_all(&self) -> Result<Vec<Candle>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut candles = Vec::new();
        for result in reader.deserialize() {
            let record: CandleRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let open_time = parse_timestamp(&record.date)?;
            candles.push(Candle::new(
                open_time,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        candles.sort_by_key(|c| c.open_time);
        debug!(count = candles.len(), path = %self.path.display(), "loaded candles");
        Ok(candles)
    }
}

/// CSV source for level-1 updates.
pub struct Level1CsvSource {
    path: PathBuf,
}

impl Level1CsvSource {
    /// Create a source for the given file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load all updates in file order.
    pub fn load_all(&self) -> Result<Vec<Level1Update>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut updates = Vec::new();
        for result in reader.deserialize() {
            let record: Level1Record = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;

            let mut update = Level1Update::new(record.symbol, timestamp);
            let columns = [
                (Level1Field::BestBidPrice, record.best_bid_price),
                (Level1Field::BestBidVolume, record.best_bid_volume),
                (Level1Field::BestAskPrice, record.best_ask_price),
                (Level1Field::BestAskVolume, record.best_ask_volume),
                (Level1Field::LastTradePrice, record.last_trade_price),
                (Level1Field::LastTradeVolume, record.last_trade_volume),
            ];
            for (field, value) in columns {
                if let Some(value) = value {
                    update = update.with(field, value);
                }
            }
            updates.push(update);
        }

        debug!(count = updates.len(), path = %self.path.display(), "loaded level-1 updates");
        Ok(updates)
    }
}

/// Parse the timestamp formats seen in replay files.
fn parse_timestamp(date_str: &str) -> Result<DateTime<Utc>, DataError> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            // Dates without a time component are midnight UTC.
            return Ok(d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
    }
    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds past 10 digits.
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = dt {
            return Ok(dt);
        }
    }

    Err(DataError::ParseError(format!(
        "could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("1705312800000").is_ok());
        assert!(parse_timestamp("1705312800").is_ok());
        assert!(parse_timestamp("not a date").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            CandleCsvSource::new("/nonexistent/candles.csv"),
            Err(DataError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_candles() {
        let mut file = tempfile();
        writeln!(file.1, "date,open,high,low,close,volume").unwrap();
        writeln!(file.1, "2024-01-16,101,111,96,106,2000").unwrap();
        writeln!(file.1, "2024-01-15,100,110,95,105,1000").unwrap();
        file.1.flush().unwrap();

        let source = CandleCsvSource::new(&file.0).unwrap();
        let candles = source.load_all().unwrap();

        assert_eq!(candles.len(), 2);
        // Sorted by open time.
        assert_eq!(candles[0].close, dec!(105));
        assert_eq!(candles[1].close, dec!(106));
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn test_load_sparse_level1() {
        let mut file = tempfile();
        writeln!(
            file.1,
            "date,symbol,best_bid_price,best_ask_price,last_trade_price"
        )
        .unwrap();
        writeln!(file.1, "2024-01-15 10:00:00,AAPL,100.5,100.7,").unwrap();
        writeln!(file.1, "2024-01-15 10:00:01,AAPL,,,100.6").unwrap();
        file.1.flush().unwrap();

        let source = Level1CsvSource::new(&file.0).unwrap();
        let updates = source.load_all().unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].get(Level1Field::BestBidPrice), Some(dec!(100.5)));
        assert_eq!(updates[0].get(Level1Field::LastTradePrice), None);
        assert_eq!(updates[1].get(Level1Field::LastTradePrice), Some(dec!(100.6)));
        std::fs::remove_file(&file.0).ok();
    }

    fn tempfile() -> (PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "tickflow-test-{}-{}.csv",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .subsec_nanos()
        ));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
