//! OHLCV candle type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// High-precision OHLCV candle.
/// Uses Decimal for exact arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Opening time of the candle period
    pub open_time: DateTime<Utc>,
    /// Opening price
    pub open: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Trading volume
    pub volume: Decimal,
}

impl Candle {
    /// Create a new candle.
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the median price (HL average).
    #[inline]
    pub fn median_price(&self) -> Decimal {
        (self.high + self.low) / Decimal::TWO
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }

    /// Calculate the candle's range (high - low).
    #[inline]
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Check if the candle is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}
