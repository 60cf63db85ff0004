//! Key-value storage for indicator persistence.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SettingsError;

/// String-keyed configuration store used by `Indicator::save`/`load`.
///
/// Supports nested sub-stores so composite indicators can persist each
/// child under its own role key. The on-disk format is the caller's
/// concern; this type only models the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStorage {
    entries: Map<String, Value>,
}

impl SettingsStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value under a key, replacing any previous value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value).map_err(|e| SettingsError::Value {
            key: key.to_string(),
            source: e,
        })?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Get a required value; absent keys are an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, SettingsError> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| SettingsError::MissingKey(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| SettingsError::Value {
            key: key.to_string(),
            source: e,
        })
    }

    /// Get a value, falling back to a default when the key is absent.
    /// A present-but-malformed value is still an error.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, SettingsError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| SettingsError::Value {
                    key: key.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Nest a sub-store under a key.
    pub fn set_nested(&mut self, key: &str, nested: SettingsStorage) {
        self.entries
            .insert(key.to_string(), Value::Object(nested.entries));
    }

    /// Get a required nested sub-store.
    pub fn nested(&self, key: &str) -> Result<SettingsStorage, SettingsError> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| SettingsError::MissingKey(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| SettingsError::Value {
            key: key.to_string(),
            source: e,
        })
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the storage has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
