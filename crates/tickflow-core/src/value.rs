//! The value wrapper flowing through the indicator pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IndicatorError;
use crate::indicator::IndicatorId;
use crate::types::{Candle, Level1Update};

/// Semantic type of a payload, used for declared input/output kinds
/// and in `TypeMismatch` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Empty,
    Decimal,
    Candle,
    Level1,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Empty => "empty",
            ValueKind::Decimal => "decimal",
            ValueKind::Candle => "candle",
            ValueKind::Level1 => "level1",
        };
        write!(f, "{}", s)
    }
}

/// Typed payload carried by an [`IndicatorValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicatorPayload {
    /// No computable result
    Empty,
    /// Scalar value
    Decimal(Decimal),
    /// OHLCV candle
    Candle(Candle),
    /// Level-1 change message
    Level1(Level1Update),
}

impl IndicatorPayload {
    /// Semantic kind of this payload.
    pub fn kind(&self) -> ValueKind {
        match self {
            IndicatorPayload::Empty => ValueKind::Empty,
            IndicatorPayload::Decimal(_) => ValueKind::Decimal,
            IndicatorPayload::Candle(_) => ValueKind::Candle,
            IndicatorPayload::Level1(_) => ValueKind::Level1,
        }
    }
}

/// A typed datum flowing through the pipeline.
///
/// Carries the identity of the indicator that produced it, a finality
/// flag, and an optional back-link to the input that produced it.
/// Beyond the flags set by the producing indicator, values are
/// immutable data carriers.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorValue {
    indicator: IndicatorId,
    payload: IndicatorPayload,
    is_final: bool,
    input: Option<Box<IndicatorValue>>,
}

impl IndicatorValue {
    /// Create a value owned by the given indicator.
    pub fn new(indicator: IndicatorId, payload: IndicatorPayload) -> Self {
        Self {
            indicator,
            payload,
            is_final: false,
            input: None,
        }
    }

    /// Create an empty value (no computable result).
    pub fn empty(indicator: IndicatorId) -> Self {
        Self::new(indicator, IndicatorPayload::Empty)
    }

    /// Identity of the indicator that produced this value.
    pub fn indicator(&self) -> IndicatorId {
        self.indicator
    }

    /// The raw payload.
    pub fn payload(&self) -> &IndicatorPayload {
        &self.payload
    }

    /// Semantic kind of the payload.
    pub fn kind(&self) -> ValueKind {
        self.payload.kind()
    }

    /// Whether this value carries no computable result.
    pub fn is_empty(&self) -> bool {
        matches!(self.payload, IndicatorPayload::Empty)
    }

    /// Whether this sample is a committed observation rather than a
    /// provisional update.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Set the finality flag. Finality is determined by the caller's
    /// input, not by the transform, so it is stamped post-construction.
    pub fn set_final(&mut self, is_final: bool) {
        self.is_final = is_final;
    }

    /// Back-link to the input value that produced this one, if stamped.
    pub fn input(&self) -> Option<&IndicatorValue> {
        self.input.as_deref()
    }

    pub(crate) fn set_input(&mut self, input: IndicatorValue) {
        self.input = Some(Box::new(input));
    }

    /// Get the payload as a scalar.
    ///
    /// A candle payload coerces to its close price; anything else that
    /// is not a decimal fails with `TypeMismatch`.
    pub fn decimal(&self) -> Result<Decimal, IndicatorError> {
        match &self.payload {
            IndicatorPayload::Decimal(value) => Ok(*value),
            IndicatorPayload::Candle(candle) => Ok(candle.close),
            other => Err(IndicatorError::TypeMismatch {
                requested: ValueKind::Decimal,
                actual: other.kind(),
            }),
        }
    }

    /// Get the payload as a candle.
    pub fn candle(&self) -> Result<&Candle, IndicatorError> {
        match &self.payload {
            IndicatorPayload::Candle(candle) => Ok(candle),
            other => Err(IndicatorError::TypeMismatch {
                requested: ValueKind::Candle,
                actual: other.kind(),
            }),
        }
    }

    /// Get the payload as a level-1 message.
    pub fn level1(&self) -> Result<&Level1Update, IndicatorError> {
        match &self.payload {
            IndicatorPayload::Level1(update) => Ok(update),
            other => Err(IndicatorError::TypeMismatch {
                requested: ValueKind::Level1,
                actual: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_accessor() {
        let id = IndicatorId::new();
        let value = IndicatorValue::new(id, IndicatorPayload::Decimal(dec!(42.5)));

        assert_eq!(value.decimal().unwrap(), dec!(42.5));
        assert_eq!(value.kind(), ValueKind::Decimal);
        assert!(!value.is_empty());
        assert!(value.candle().is_err());
    }

    #[test]
    fn test_candle_coerces_to_close() {
        let id = IndicatorId::new();
        let candle = Candle::new(
            Utc::now(),
            dec!(100),
            dec!(110),
            dec!(95),
            dec!(105),
            dec!(1000),
        );
        let value = IndicatorValue::new(id, IndicatorPayload::Candle(candle));

        assert_eq!(value.decimal().unwrap(), dec!(105));
    }

    #[test]
    fn test_empty_value() {
        let id = IndicatorId::new();
        let value = IndicatorValue::empty(id);

        assert!(value.is_empty());
        assert_eq!(value.kind(), ValueKind::Empty);
        let err = value.decimal().unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::TypeMismatch {
                requested: ValueKind::Decimal,
                actual: ValueKind::Empty,
            }
        ));
    }

    #[test]
    fn test_finality_is_stamped_post_construction() {
        let id = IndicatorId::new();
        let mut value = IndicatorValue::new(id, IndicatorPayload::Decimal(dec!(1)));

        assert!(!value.is_final());
        value.set_final(true);
        assert!(value.is_final());
    }
}
