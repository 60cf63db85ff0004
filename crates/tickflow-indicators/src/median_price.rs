//! Median price candle reduction.

use tickflow_core::{
    IndicatorCore, IndicatorError, IndicatorPayload, IndicatorTransform, IndicatorValue, ValueKind,
};

/// Median price of a candle: (high + low) / 2.
///
/// A pass-through reduction stage; one final candle is enough warm-up.
#[derive(Debug)]
pub struct MedianPrice {
    core: IndicatorCore,
}

impl Default for MedianPrice {
    fn default() -> Self {
        Self {
            core: IndicatorCore::new("Median Price"),
        }
    }
}

impl IndicatorTransform for MedianPrice {
    fn core(&self) -> &IndicatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut IndicatorCore {
        &mut self.core
    }

    fn on_process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError> {
        let candle = input.candle()?;
        Ok(self
            .core
            .create_value(IndicatorPayload::Decimal(candle.median_price())))
    }

    fn calc_is_formed(&self) -> bool {
        !self.core.container().is_empty()
    }

    fn declared_input(&self) -> ValueKind {
        ValueKind::Candle
    }
}
