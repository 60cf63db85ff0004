//! Awesome Oscillator composite indicator.

use tickflow_core::{
    Indicator, IndicatorCore, IndicatorError, IndicatorMeasure, IndicatorPayload,
    IndicatorTransform, IndicatorValue, SettingsError, SettingsStorage, ValueKind,
};

use crate::median_price::MedianPrice;
use crate::moving_average::Sma;

const LONG_KEY: &str = "long_ma";
const SHORT_KEY: &str = "short_ma";
const MEDIAN_KEY: &str = "median_price";

/// Awesome Oscillator: SMA(median, 5) - SMA(median, 34).
///
/// Owns a shared median-price reduction stage and two SMA children and
/// drives them through their own `process` calls, so each child keeps
/// its own history and finality bookkeeping. Formation gates on the
/// long child alone: it has the largest warm-up, and this composite's
/// policy is that the slow window is the one that must be trusted.
#[derive(Debug)]
pub struct AwesomeOscillator {
    core: IndicatorCore,
    median_price: MedianPrice,
    long_ma: Sma,
    short_ma: Sma,
}

impl AwesomeOscillator {
    /// Create an oscillator with custom window lengths.
    pub fn with_lengths(long: usize, short: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            core: IndicatorCore::new("Awesome Oscillator"),
            median_price: MedianPrice::default(),
            long_ma: Sma::new(long)?,
            short_ma: Sma::new(short)?,
        })
    }

    /// The long (slow) window length.
    pub fn long_length(&self) -> usize {
        self.long_ma.length()
    }

    /// The short (fast) window length.
    pub fn short_length(&self) -> usize {
        self.short_ma.length()
    }
}

impl Default for AwesomeOscillator {
    fn default() -> Self {
        // The canonical 34/5 windows; non-zero lengths cannot fail.
        Self {
            core: IndicatorCore::new("Awesome Oscillator"),
            median_price: MedianPrice::default(),
            long_ma: Sma::new(34).expect("non-zero length"),
            short_ma: Sma::new(5).expect("non-zero length"),
        }
    }
}

impl IndicatorTransform for AwesomeOscillator {
    fn core(&self) -> &IndicatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut IndicatorCore {
        &mut self.core
    }

    fn on_process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError> {
        let median = self.median_price.process(input)?;

        let long = self.long_ma.process(&median)?;
        let short = self.short_ma.process(&median)?;

        let oscillator = short.decimal()? - long.decimal()?;
        Ok(self
            .core
            .create_value(IndicatorPayload::Decimal(oscillator)))
    }

    fn calc_is_formed(&self) -> bool {
        self.long_ma.is_formed()
    }

    fn warmup_count(&self) -> usize {
        self.long_ma
            .warmup_period()
            .max(self.short_ma.warmup_period())
            .max(self.median_price.warmup_period())
    }

    fn declared_measure(&self) -> IndicatorMeasure {
        IndicatorMeasure::MinusOneToOne
    }

    fn declared_input(&self) -> ValueKind {
        ValueKind::Candle
    }

    fn on_reset(&mut self) {
        self.median_price.reset();
        self.long_ma.reset();
        self.short_ma.reset();
    }

    fn save_config(&self, storage: &mut SettingsStorage) -> Result<(), SettingsError> {
        let mut long = SettingsStorage::new();
        self.long_ma.save(&mut long)?;
        storage.set_nested(LONG_KEY, long);

        let mut short = SettingsStorage::new();
        self.short_ma.save(&mut short)?;
        storage.set_nested(SHORT_KEY, short);

        let mut median = SettingsStorage::new();
        self.median_price.save(&mut median)?;
        storage.set_nested(MEDIAN_KEY, median);

        Ok(())
    }

    fn load_config(&mut self, storage: &SettingsStorage) -> Result<(), IndicatorError> {
        let long = storage.nested(LONG_KEY).map_err(IndicatorError::from)?;
        self.long_ma.load(&long)?;

        let short = storage.nested(SHORT_KEY).map_err(IndicatorError::from)?;
        self.short_ma.load(&short)?;

        let median = storage.nested(MEDIAN_KEY).map_err(IndicatorError::from)?;
        self.median_price.load(&median)?;

        Ok(())
    }
}
