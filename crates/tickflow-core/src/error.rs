//! Error types for the indicator pipeline.

use thiserror::Error;

use crate::indicator::IndicatorId;
use crate::value::ValueKind;

/// Indicator contract and processing errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error(
        "transform of '{indicator}' returned a value owned by {actual}, expected {expected}"
    )]
    InvalidResult {
        indicator: String,
        expected: IndicatorId,
        actual: IndicatorId,
    },

    #[error("payload requested as {requested}, but holds {actual}")]
    TypeMismatch {
        requested: ValueKind,
        actual: ValueKind,
    },

    #[error("configuration error: {0}")]
    Configuration(#[from] SettingsError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Settings storage errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("missing configuration key: {0}")]
    MissingKey(String),

    #[error("invalid value for key '{key}': {source}")]
    Value {
        key: String,
        source: serde_json::Error,
    },
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("data file not found: {0}")]
    FileNotFound(String),

    #[error("parse error: {0}")]
    ParseError(String),
}
