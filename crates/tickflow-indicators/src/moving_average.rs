//! Streaming moving average indicators.

use rust_decimal::Decimal;
use std::collections::VecDeque;

use tickflow_core::{
    Indicator, IndicatorCore, IndicatorError, IndicatorPayload, IndicatorTransform, IndicatorValue,
    SettingsError, SettingsStorage,
};

const DEFAULT_LENGTH: usize = 15;

fn validate_length(length: usize) -> Result<(), IndicatorError> {
    if length == 0 {
        return Err(IndicatorError::InvalidArgument(
            "moving average length must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Simple Moving Average (SMA).
///
/// Arithmetic mean over the last N final inputs. Final inputs commit
/// to the rolling buffer; provisional inputs compute a sliding preview
/// without committing. The emitted value is always `sum / length`, so
/// consumers gate on `is_formed` during warm-up.
#[derive(Debug)]
pub struct Sma {
    core: IndicatorCore,
    length: usize,
    buffer: VecDeque<Decimal>,
    sum: Decimal,
}

impl Sma {
    /// Create an SMA with the given window length.
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        validate_length(length)?;
        Ok(Self {
            core: IndicatorCore::new("SMA"),
            length,
            buffer: VecDeque::with_capacity(length),
            sum: Decimal::ZERO,
        })
    }

    /// The window length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Change the window length. Discards all accumulated state.
    pub fn set_length(&mut self, length: usize) -> Result<(), IndicatorError> {
        validate_length(length)?;
        self.length = length;
        Indicator::reset(self);
        Ok(())
    }
}

impl Default for Sma {
    fn default() -> Self {
        Self {
            core: IndicatorCore::new("SMA"),
            length: DEFAULT_LENGTH,
            buffer: VecDeque::with_capacity(DEFAULT_LENGTH),
            sum: Decimal::ZERO,
        }
    }
}

impl IndicatorTransform for Sma {
    fn core(&self) -> &IndicatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut IndicatorCore {
        &mut self.core
    }

    fn on_process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError> {
        let value = input.decimal()?;
        let length = Decimal::from(self.length as u64);

        let average = if input.is_final() {
            self.buffer.push_back(value);
            self.sum += value;
            if self.buffer.len() > self.length {
                if let Some(oldest) = self.buffer.pop_front() {
                    self.sum -= oldest;
                }
            }
            self.sum / length
        } else {
            // Preview: slide the window as if this value committed.
            let mut sum = self.sum + value;
            if self.buffer.len() >= self.length {
                if let Some(oldest) = self.buffer.front() {
                    sum -= *oldest;
                }
            }
            sum / length
        };

        Ok(self.core.create_value(IndicatorPayload::Decimal(average)))
    }

    fn calc_is_formed(&self) -> bool {
        self.buffer.len() >= self.length
    }

    fn warmup_count(&self) -> usize {
        self.length
    }

    fn on_reset(&mut self) {
        self.buffer.clear();
        self.sum = Decimal::ZERO;
    }

    fn save_config(&self, storage: &mut SettingsStorage) -> Result<(), SettingsError> {
        storage.set("length", self.length)
    }

    fn load_config(&mut self, storage: &SettingsStorage) -> Result<(), IndicatorError> {
        let length: usize = storage.get("length").map_err(IndicatorError::from)?;
        self.set_length(length)
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeds with the SMA of the first N final inputs, then applies
/// exponential smoothing with `k = 2 / (N + 1)`. Provisional inputs
/// preview the next value without committing the smoothed state.
#[derive(Debug)]
pub struct Ema {
    core: IndicatorCore,
    length: usize,
    multiplier: Decimal,
    prev: Option<Decimal>,
    sum: Decimal,
    count: usize,
}

impl Ema {
    /// Create an EMA with the given length.
    pub fn new(length: usize) -> Result<Self, IndicatorError> {
        validate_length(length)?;
        Ok(Self {
            core: IndicatorCore::new("EMA"),
            length,
            multiplier: Self::multiplier_for(length),
            prev: None,
            sum: Decimal::ZERO,
            count: 0,
        })
    }

    fn multiplier_for(length: usize) -> Decimal {
        Decimal::TWO / Decimal::from(length as u64 + 1)
    }

    /// The smoothing length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Change the length. Discards all accumulated state.
    pub fn set_length(&mut self, length: usize) -> Result<(), IndicatorError> {
        validate_length(length)?;
        self.length = length;
        self.multiplier = Self::multiplier_for(length);
        Indicator::reset(self);
        Ok(())
    }
}

impl Default for Ema {
    fn default() -> Self {
        Self {
            core: IndicatorCore::new("EMA"),
            length: DEFAULT_LENGTH,
            multiplier: Self::multiplier_for(DEFAULT_LENGTH),
            prev: None,
            sum: Decimal::ZERO,
            count: 0,
        }
    }
}

impl IndicatorTransform for Ema {
    fn core(&self) -> &IndicatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut IndicatorCore {
        &mut self.core
    }

    fn on_process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError> {
        let value = input.decimal()?;

        let current = match self.prev {
            Some(prev) => (value - prev) * self.multiplier + prev,
            // Still seeding: running mean of the finals seen so far
            // plus this value.
            None => (self.sum + value) / Decimal::from(self.count as u64 + 1),
        };

        if input.is_final() {
            match self.prev {
                Some(_) => self.prev = Some(current),
                None => {
                    self.sum += value;
                    self.count += 1;
                    if self.count == self.length {
                        self.prev = Some(self.sum / Decimal::from(self.length as u64));
                    }
                }
            }
        }

        Ok(self.core.create_value(IndicatorPayload::Decimal(current)))
    }

    fn calc_is_formed(&self) -> bool {
        self.prev.is_some()
    }

    fn warmup_count(&self) -> usize {
        self.length
    }

    fn on_reset(&mut self) {
        self.prev = None;
        self.sum = Decimal::ZERO;
        self.count = 0;
    }

    fn save_config(&self, storage: &mut SettingsStorage) -> Result<(), SettingsError> {
        storage.set("length", self.length)
    }

    fn load_config(&mut self, storage: &SettingsStorage) -> Result<(), IndicatorError> {
        let length: usize = storage.get("length").map_err(IndicatorError::from)?;
        self.set_length(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feed(indicator: &mut impl Indicator, value: Decimal, is_final: bool) -> IndicatorValue {
        let mut input = indicator.create_value(IndicatorPayload::Decimal(value));
        input.set_final(is_final);
        indicator.process(&input).unwrap()
    }

    #[test]
    fn test_sma_rejects_zero_length() {
        assert!(matches!(
            Sma::new(0),
            Err(IndicatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sma_window_values() {
        let mut sma = Sma::new(3).unwrap();

        feed(&mut sma, dec!(1), true);
        feed(&mut sma, dec!(2), true);
        let r3 = feed(&mut sma, dec!(3), true);
        assert_eq!(r3.decimal().unwrap(), dec!(2));

        // Window slides: (2 + 3 + 7) / 3
        let r4 = feed(&mut sma, dec!(7), true);
        assert_eq!(r4.decimal().unwrap(), dec!(4));
    }

    #[test]
    fn test_sma_formed_after_length_finals() {
        let mut sma = Sma::new(3).unwrap();
        assert_eq!(sma.warmup_period(), 3);

        feed(&mut sma, dec!(1), true);
        feed(&mut sma, dec!(2), true);
        assert!(!sma.is_formed());

        feed(&mut sma, dec!(3), true);
        assert!(sma.is_formed());
    }

    #[test]
    fn test_sma_preview_does_not_commit() {
        let mut sma = Sma::new(3).unwrap();
        feed(&mut sma, dec!(1), true);
        feed(&mut sma, dec!(2), true);
        feed(&mut sma, dec!(3), true);

        // Provisional 9: previewed as (2 + 3 + 9) / 3 without commit.
        let preview = feed(&mut sma, dec!(9), false);
        assert_eq!(preview.decimal().unwrap(), dec!(14) / dec!(3));

        // The committed window is unchanged: (2 + 3 + 6) / 3.
        let committed = feed(&mut sma, dec!(6), true);
        assert_eq!(committed.decimal().unwrap(), dec!(11) / dec!(3));
        assert_eq!(sma.container().len(), 4);
    }

    #[test]
    fn test_sma_set_length_resets() {
        let mut sma = Sma::new(2).unwrap();
        feed(&mut sma, dec!(1), true);
        feed(&mut sma, dec!(2), true);
        assert!(sma.is_formed());

        sma.set_length(3).unwrap();
        assert!(!sma.is_formed());
        assert!(sma.container().is_empty());
        assert_eq!(sma.warmup_period(), 3);
        assert!(sma.set_length(0).is_err());
    }

    #[test]
    fn test_sma_persistence_roundtrip() {
        let original = Sma::new(5).unwrap();
        let mut storage = SettingsStorage::new();
        original.save(&mut storage).unwrap();

        let mut restored = Sma::default();
        restored.load(&storage).unwrap();
        assert_eq!(restored.length(), 5);
        assert_eq!(restored.id(), original.id());
    }

    #[test]
    fn test_ema_seeds_with_sma_then_smooths() {
        let mut ema = Ema::new(3).unwrap();

        feed(&mut ema, dec!(1), true);
        feed(&mut ema, dec!(2), true);
        assert!(!ema.is_formed());

        // Seed: (1 + 2 + 3) / 3 = 2
        let seed = feed(&mut ema, dec!(3), true);
        assert_eq!(seed.decimal().unwrap(), dec!(2));
        assert!(ema.is_formed());

        // k = 2/4 = 0.5; (6 - 2) * 0.5 + 2 = 4
        let next = feed(&mut ema, dec!(6), true);
        assert_eq!(next.decimal().unwrap(), dec!(4));
    }

    #[test]
    fn test_ema_persistence_roundtrip() {
        let original = Ema::new(21).unwrap();
        let mut storage = SettingsStorage::new();
        original.save(&mut storage).unwrap();

        let mut restored = Ema::default();
        restored.load(&storage).unwrap();
        assert_eq!(restored.length(), 21);
        assert_eq!(restored.id(), original.id());
    }

    #[test]
    fn test_ema_clone_shares_no_smoothing_state() {
        let mut original = Ema::new(2).unwrap();
        feed(&mut original, dec!(1), true);
        feed(&mut original, dec!(3), true);
        assert!(original.is_formed());

        let clone = original.clone_boxed().unwrap();
        assert_eq!(clone.id(), original.id());
        assert_eq!(clone.warmup_period(), 2);
        assert!(!clone.is_formed());
        assert!(clone.container().is_empty());

        // Advancing the source leaves the clone untouched.
        feed(&mut original, dec!(5), true);
        assert_eq!(original.container().len(), 3);
        assert!(clone.container().is_empty());
    }

    #[test]
    fn test_ema_preview_does_not_commit_prev() {
        let mut ema = Ema::new(3).unwrap();
        feed(&mut ema, dec!(1), true);
        feed(&mut ema, dec!(2), true);
        feed(&mut ema, dec!(3), true);

        let preview = feed(&mut ema, dec!(10), false);
        assert_eq!(preview.decimal().unwrap(), dec!(6));

        // prev is still the seed value 2.
        let committed = feed(&mut ema, dec!(6), true);
        assert_eq!(committed.decimal().unwrap(), dec!(4));
    }
}
