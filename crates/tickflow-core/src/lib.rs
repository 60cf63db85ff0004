//! Core types for the streaming indicator pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data payloads (Candle, Level1Update)
//! - The indicator value wrapper and its history container
//! - The `Indicator` contract and the shared lifecycle engine
//! - The key-value settings storage used for indicator persistence

pub mod container;
pub mod error;
pub mod indicator;
pub mod settings;
pub mod types;
pub mod value;

pub use container::IndicatorContainer;
pub use error::{DataError, IndicatorError, SettingsError};
pub use indicator::{
    ChangedHandler, Indicator, IndicatorCore, IndicatorId, IndicatorMeasure, IndicatorTransform,
    ResetHandler,
};
pub use settings::SettingsStorage;
pub use types::{Candle, Level1Field, Level1Update};
pub use value::{IndicatorPayload, IndicatorValue, ValueKind};
