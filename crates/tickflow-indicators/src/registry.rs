//! Indicator registry for dynamic creation by key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tickflow_core::{Indicator, IndicatorError, SettingsStorage};

use crate::{AwesomeOscillator, Ema, Level1Indicator, MedianPrice, Sma};

/// Information about a registered indicator kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorInfo {
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Default persisted settings as JSON
    pub default_settings: serde_json::Value,
}

/// Registry of available indicator kinds, keyed by string.
pub struct IndicatorRegistry {
    indicators: HashMap<String, IndicatorInfo>,
}

impl IndicatorRegistry {
    /// Create a registry with all built-in indicators.
    pub fn new() -> Self {
        let mut indicators = HashMap::new();

        indicators.insert(
            "sma".to_string(),
            IndicatorInfo {
                name: "SMA".to_string(),
                description: "Arithmetic mean over the last N final values".to_string(),
                default_settings: default_settings_of(&Sma::default()),
            },
        );

        indicators.insert(
            "ema".to_string(),
            IndicatorInfo {
                name: "EMA".to_string(),
                description: "Exponentially smoothed average seeded with an SMA".to_string(),
                default_settings: default_settings_of(&Ema::default()),
            },
        );

        indicators.insert(
            "median_price".to_string(),
            IndicatorInfo {
                name: "Median Price".to_string(),
                description: "Candle (high + low) / 2 reduction".to_string(),
                default_settings: default_settings_of(&MedianPrice::default()),
            },
        );

        indicators.insert(
            "awesome_oscillator".to_string(),
            IndicatorInfo {
                name: "Awesome Oscillator".to_string(),
                description: "Short SMA minus long SMA over candle median prices".to_string(),
                default_settings: default_settings_of(&AwesomeOscillator::default()),
            },
        );

        indicators.insert(
            "level1".to_string(),
            IndicatorInfo {
                name: "Level1".to_string(),
                description: "Extracts one field from level-1 change messages".to_string(),
                default_settings: default_settings_of(&Level1Indicator::default()),
            },
        );

        Self { indicators }
    }

    /// List all registered kinds.
    pub fn list(&self) -> Vec<&IndicatorInfo> {
        self.indicators.values().collect()
    }

    /// Get info by key.
    pub fn get(&self, key: &str) -> Option<&IndicatorInfo> {
        self.indicators.get(key)
    }

    /// Check if a kind exists.
    pub fn exists(&self, key: &str) -> bool {
        self.indicators.contains_key(key)
    }

    /// Get all registered keys.
    pub fn keys(&self) -> Vec<&String> {
        self.indicators.keys().collect()
    }

    /// Create a default-configured indicator.
    pub fn create(&self, key: &str) -> Result<Box<dyn Indicator>, IndicatorError> {
        match key {
            "sma" => Ok(Box::new(Sma::default())),
            "ema" => Ok(Box::new(Ema::default())),
            "median_price" => Ok(Box::new(MedianPrice::default())),
            "awesome_oscillator" => Ok(Box::new(AwesomeOscillator::default())),
            "level1" => Ok(Box::new(Level1Indicator::default())),
            _ => Err(IndicatorError::InvalidArgument(format!(
                "unknown indicator kind: {}",
                key
            ))),
        }
    }

    /// Create an indicator and restore it from persisted settings.
    pub fn create_from(
        &self,
        key: &str,
        storage: &SettingsStorage,
    ) -> Result<Box<dyn Indicator>, IndicatorError> {
        let mut indicator = self.create(key)?;
        indicator.load(storage)?;
        Ok(indicator)
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_settings_of(indicator: &impl Indicator) -> serde_json::Value {
    let mut storage = SettingsStorage::new();
    // Saving fresh defaults to an in-memory map cannot fail.
    indicator
        .save(&mut storage)
        .map(|_| serde_json::to_value(&storage).unwrap_or_default())
        .unwrap_or_default()
}
