//! Streaming indicators built on the `tickflow-core` lifecycle.
//!
//! This crate provides the concrete transforms:
//! - Moving averages (SMA, EMA)
//! - Candle reductions (median price)
//! - The Awesome Oscillator composite
//! - Level-1 field extraction
//!
//! plus a string-keyed registry for creating indicators dynamically.

pub mod awesome_oscillator;
pub mod level1;
pub mod median_price;
pub mod moving_average;
pub mod registry;

pub use awesome_oscillator::AwesomeOscillator;
pub use level1::Level1Indicator;
pub use median_price::MedianPrice;
pub use moving_average::{Ema, Sma};
pub use registry::{IndicatorInfo, IndicatorRegistry};
