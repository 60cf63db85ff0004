//! Replay data sources for the indicator pipeline.
//!
//! These are demo collaborators: the core never parses wire formats,
//! so CSV handling lives here.

mod csv_source;

pub use csv_source::{CandleCsvSource, Level1CsvSource};
