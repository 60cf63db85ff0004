//! Level-1 field extraction indicator.

use tickflow_core::{
    IndicatorCore, IndicatorError, IndicatorPayload, IndicatorTransform, IndicatorValue,
    Level1Field, SettingsError, SettingsStorage, ValueKind,
};

/// Extracts one configured field from level-1 change messages.
///
/// A field absent on a given update is an expected, common case and
/// yields an empty result, not an error. One final update carrying the
/// field is enough warm-up for this pass-through extractor.
#[derive(Debug)]
pub struct Level1Indicator {
    core: IndicatorCore,
    field: Level1Field,
    observed: bool,
}

impl Level1Indicator {
    /// Create an extractor for the given field.
    pub fn new(field: Level1Field) -> Self {
        Self {
            core: IndicatorCore::new("Level1"),
            field,
            observed: false,
        }
    }

    /// The extracted field.
    pub fn field(&self) -> Level1Field {
        self.field
    }

    /// Change the extracted field.
    pub fn set_field(&mut self, field: Level1Field) {
        self.field = field;
    }
}

impl Default for Level1Indicator {
    fn default() -> Self {
        Self::new(Level1Field::LastTradePrice)
    }
}

impl IndicatorTransform for Level1Indicator {
    fn core(&self) -> &IndicatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut IndicatorCore {
        &mut self.core
    }

    fn on_process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError> {
        let update = input.level1()?;

        match update.get(self.field) {
            None => Ok(self.core.create_empty()),
            Some(value) => {
                if input.is_final() {
                    self.observed = true;
                }
                Ok(self.core.create_value(IndicatorPayload::Decimal(value)))
            }
        }
    }

    fn calc_is_formed(&self) -> bool {
        self.observed
    }

    fn declared_input(&self) -> ValueKind {
        ValueKind::Level1
    }

    fn on_reset(&mut self) {
        self.observed = false;
    }

    fn save_config(&self, storage: &mut SettingsStorage) -> Result<(), SettingsError> {
        storage.set("field", self.field)
    }

    fn load_config(&mut self, storage: &SettingsStorage) -> Result<(), IndicatorError> {
        // Explicit default-with-fallback read: older saved settings
        // may predate the field key.
        self.field = storage
            .get_or("field", Level1Field::LastTradePrice)
            .map_err(IndicatorError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tickflow_core::{Indicator, Level1Update};

    fn update_input(
        indicator: &impl Indicator,
        field: Option<(Level1Field, rust_decimal::Decimal)>,
        is_final: bool,
    ) -> IndicatorValue {
        let mut update = Level1Update::new("AAPL", Utc::now());
        if let Some((f, v)) = field {
            update = update.with(f, v);
        }
        let mut input = indicator.create_value(IndicatorPayload::Level1(update));
        input.set_final(is_final);
        input
    }

    #[test]
    fn test_extraction_scenario() {
        let mut extractor = Level1Indicator::new(Level1Field::BestBidPrice);
        assert_eq!(extractor.warmup_period(), 1);

        // Final update carrying the field: value out, formed.
        let r1 = extractor
            .process(&update_input(
                &extractor,
                Some((Level1Field::BestBidPrice, dec!(100))),
                true,
            ))
            .unwrap();
        assert_eq!(r1.decimal().unwrap(), dec!(100));
        assert!(extractor.is_formed());
        assert_eq!(extractor.container().len(), 1);

        // Non-final update without the field: empty, no history entry.
        let r2 = extractor
            .process(&update_input(&extractor, None, false))
            .unwrap();
        assert!(r2.is_empty());
        assert!(extractor.is_formed());
        assert_eq!(extractor.container().len(), 1);

        // Final update with the field again.
        let r3 = extractor
            .process(&update_input(
                &extractor,
                Some((Level1Field::BestBidPrice, dec!(101))),
                true,
            ))
            .unwrap();
        assert_eq!(r3.decimal().unwrap(), dec!(101));
        assert_eq!(extractor.container().len(), 2);
    }

    #[test]
    fn test_absent_field_is_not_an_error() {
        let mut extractor = Level1Indicator::new(Level1Field::BestAskPrice);

        let result = extractor
            .process(&update_input(
                &extractor,
                Some((Level1Field::BestBidPrice, dec!(100))),
                true,
            ))
            .unwrap();
        assert!(result.is_empty());
        assert!(!extractor.is_formed());
    }

    #[test]
    fn test_non_final_presence_does_not_form() {
        let mut extractor = Level1Indicator::new(Level1Field::BestBidPrice);

        extractor
            .process(&update_input(
                &extractor,
                Some((Level1Field::BestBidPrice, dec!(100))),
                false,
            ))
            .unwrap();
        assert!(!extractor.is_formed());
        assert!(extractor.container().is_empty());
    }

    #[test]
    fn test_field_load_falls_back_to_default() {
        let extractor = Level1Indicator::new(Level1Field::BestBidPrice);
        let mut storage = SettingsStorage::new();
        extractor.save(&mut storage).unwrap();

        let mut restored = Level1Indicator::default();
        restored.load(&storage).unwrap();
        assert_eq!(restored.field(), Level1Field::BestBidPrice);

        // A storage that predates the field key loads with the default.
        let mut legacy = SettingsStorage::new();
        legacy.set("id", extractor.id()).unwrap();
        legacy.set("name", extractor.name()).unwrap();
        let mut restored = Level1Indicator::new(Level1Field::Volume);
        restored.load(&legacy).unwrap();
        assert_eq!(restored.field(), Level1Field::LastTradePrice);
    }

    #[test]
    fn test_reset_requires_new_observation() {
        let mut extractor = Level1Indicator::new(Level1Field::BestBidPrice);
        extractor
            .process(&update_input(
                &extractor,
                Some((Level1Field::BestBidPrice, dec!(100))),
                true,
            ))
            .unwrap();
        assert!(extractor.is_formed());

        extractor.reset();
        assert!(!extractor.is_formed());
        assert!(extractor.container().is_empty());
    }
}
