//! Level-1 market data messages.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fields carried by a level-1 change message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level1Field {
    BestBidPrice,
    BestBidVolume,
    BestAskPrice,
    BestAskVolume,
    LastTradePrice,
    LastTradeVolume,
    OpenPrice,
    HighPrice,
    LowPrice,
    ClosePrice,
    Volume,
}

impl Level1Field {
    /// Get all known fields.
    pub fn all() -> &'static [Level1Field] {
        &[
            Level1Field::BestBidPrice,
            Level1Field::BestBidVolume,
            Level1Field::BestAskPrice,
            Level1Field::BestAskVolume,
            Level1Field::LastTradePrice,
            Level1Field::LastTradeVolume,
            Level1Field::OpenPrice,
            Level1Field::HighPrice,
            Level1Field::LowPrice,
            Level1Field::ClosePrice,
            Level1Field::Volume,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Level1Field::BestBidPrice => "best_bid_price",
            Level1Field::BestBidVolume => "best_bid_volume",
            Level1Field::BestAskPrice => "best_ask_price",
            Level1Field::BestAskVolume => "best_ask_volume",
            Level1Field::LastTradePrice => "last_trade_price",
            Level1Field::LastTradeVolume => "last_trade_volume",
            Level1Field::OpenPrice => "open_price",
            Level1Field::HighPrice => "high_price",
            Level1Field::LowPrice => "low_price",
            Level1Field::ClosePrice => "close_price",
            Level1Field::Volume => "volume",
        }
    }
}

impl fmt::Display for Level1Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level1Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level1Field::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("invalid level-1 field: {}", s))
    }
}

/// A sparse level-1 change message for a single symbol.
///
/// Only the fields that changed on this update are present; an absent
/// field is normal data, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level1Update {
    /// Symbol identifier
    pub symbol: String,
    /// Server time of the update
    pub timestamp: DateTime<Utc>,
    /// Changed fields and their new values
    changes: BTreeMap<Level1Field, Decimal>,
}

impl Level1Update {
    /// Create an update with no field changes.
    pub fn new(symbol: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            changes: BTreeMap::new(),
        }
    }

    /// Add a field change (builder style).
    pub fn with(mut self, field: Level1Field, value: Decimal) -> Self {
        self.changes.insert(field, value);
        self
    }

    /// Get a field's value, if present on this update.
    pub fn get(&self, field: Level1Field) -> Option<Decimal> {
        self.changes.get(&field).copied()
    }

    /// Check whether any field changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterate changed fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Level1Field, Decimal)> + '_ {
        self.changes.iter().map(|(f, v)| (*f, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_field_parse_and_display() {
        assert_eq!(
            Level1Field::from_str("best_bid_price").unwrap(),
            Level1Field::BestBidPrice
        );
        assert_eq!(Level1Field::LastTradePrice.to_string(), "last_trade_price");
        assert!(Level1Field::from_str("nope").is_err());
    }

    #[test]
    fn test_sparse_update() {
        let update = Level1Update::new("AAPL", Utc::now())
            .with(Level1Field::BestBidPrice, dec!(100.5))
            .with(Level1Field::BestAskPrice, dec!(100.7));

        assert_eq!(update.get(Level1Field::BestBidPrice), Some(dec!(100.5)));
        assert_eq!(update.get(Level1Field::LastTradePrice), None);
        assert_eq!(update.iter().count(), 2);
    }
}
