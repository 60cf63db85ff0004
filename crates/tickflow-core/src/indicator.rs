//! The indicator contract and the shared lifecycle engine.
//!
//! Concrete indicators implement [`IndicatorTransform`] — an embedded
//! [`IndicatorCore`] plus a pure `on_process` — and receive the full
//! [`Indicator`] contract through a blanket impl. The lifecycle engine
//! owns the orchestration: result validation, finality stamping,
//! history bookkeeping and change notification happen in exactly one
//! place, never per indicator.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::container::IndicatorContainer;
use crate::error::{IndicatorError, SettingsError};
use crate::settings::SettingsStorage;
use crate::value::{IndicatorPayload, IndicatorValue, ValueKind};

/// Unique identity of an indicator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorId(Uuid);

impl IndicatorId {
    /// Generate a fresh identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IndicatorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scale classification consumed by renderers and other downstream
/// observers; the core itself never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMeasure {
    /// Unrestricted price scale
    #[default]
    Price,
    /// Bounded -1..+1 oscillator scale
    MinusOneToOne,
    /// Volume scale
    Volume,
}

impl fmt::Display for IndicatorMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndicatorMeasure::Price => "price",
            IndicatorMeasure::MinusOneToOne => "minus_one_to_one",
            IndicatorMeasure::Volume => "volume",
        };
        write!(f, "{}", s)
    }
}

/// Observer invoked with `(input, result)` whenever a non-empty result
/// is produced. Delivery is synchronous on the processing thread.
pub type ChangedHandler = Arc<dyn Fn(&IndicatorValue, &IndicatorValue) + Send + Sync>;

/// Observer invoked on every reset.
pub type ResetHandler = Arc<dyn Fn() + Send + Sync>;

/// Shared per-indicator state embedded in every concrete indicator.
pub struct IndicatorCore {
    id: IndicatorId,
    name: String,
    formed: Cell<bool>,
    pub(crate) container: IndicatorContainer,
    changed_handlers: Vec<ChangedHandler>,
    reset_handlers: Vec<ResetHandler>,
}

impl IndicatorCore {
    /// Create core state with a fresh identity.
    pub fn new(name: &str) -> Self {
        Self {
            id: IndicatorId::new(),
            name: name.to_string(),
            formed: Cell::new(false),
            container: IndicatorContainer::new(),
            changed_handlers: Vec::new(),
            reset_handlers: Vec::new(),
        }
    }

    pub fn id(&self) -> IndicatorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the indicator. Empty names are rejected.
    pub fn set_name(&mut self, name: &str) -> Result<(), IndicatorError> {
        if name.trim().is_empty() {
            return Err(IndicatorError::InvalidArgument(
                "indicator name must not be empty".to_string(),
            ));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn container(&self) -> &IndicatorContainer {
        &self.container
    }

    /// Stamp a payload with this indicator's identity.
    pub fn create_value(&self, payload: IndicatorPayload) -> IndicatorValue {
        IndicatorValue::new(self.id, payload)
    }

    /// An empty result owned by this indicator.
    pub fn create_empty(&self) -> IndicatorValue {
        IndicatorValue::empty(self.id)
    }

    fn formed_cached(&self) -> bool {
        self.formed.get()
    }

    fn mark_formed(&self) {
        self.formed.set(true);
    }

    fn clear_formed(&self) {
        self.formed.set(false);
    }

    fn notify_changed(&self, input: &IndicatorValue, result: &IndicatorValue) {
        for handler in &self.changed_handlers {
            handler(input, result);
        }
    }

    fn notify_reset(&self) {
        for handler in &self.reset_handlers {
            handler();
        }
    }

    pub(crate) fn set_id(&mut self, id: IndicatorId) {
        self.id = id;
    }
}

impl fmt::Debug for IndicatorCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatorCore")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("formed", &self.formed.get())
            .field("history_len", &self.container.len())
            .finish()
    }
}

/// The polymorphic indicator contract.
///
/// Object safe: pipelines hold children and registry products as
/// `Box<dyn Indicator>`.
pub trait Indicator: Send {
    /// Unique instance identity.
    fn id(&self) -> IndicatorId;

    /// Display name.
    fn name(&self) -> &str;

    /// Rename the indicator; empty names are an `InvalidArgument`.
    fn set_name(&mut self, name: &str) -> Result<(), IndicatorError>;

    /// Scale classification for downstream consumers.
    fn measure(&self) -> IndicatorMeasure;

    /// Declared input datum kind.
    fn input_kind(&self) -> ValueKind;

    /// Declared result datum kind.
    fn result_kind(&self) -> ValueKind;

    /// Minimum final samples before formation is plausible.
    /// Composites report the maximum across their children.
    fn warmup_period(&self) -> usize;

    /// Whether enough final samples have been observed to trust the
    /// output. Monotonic once true, until the next `reset`.
    fn is_formed(&self) -> bool;

    /// The historical ledger of processed pairs.
    fn container(&self) -> &IndicatorContainer;

    /// Opt-in history cap; `None` restores unbounded retention.
    fn set_history_limit(&mut self, limit: Option<usize>);

    /// Run one observation through the indicator. The only mutating
    /// computation entry point.
    fn process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError>;

    /// Clear formed-state and history, then notify reset observers.
    fn reset(&mut self);

    /// Persist identity, name and indicator-specific configuration.
    fn save(&self, storage: &mut SettingsStorage) -> Result<(), SettingsError>;

    /// Restore from persisted configuration. Missing required keys are
    /// a `MissingConfiguration` failure, never silently defaulted.
    fn load(&mut self, storage: &SettingsStorage) -> Result<(), IndicatorError>;

    /// Independent copy via a save/load round trip. The copy shares no
    /// mutable state with the original.
    fn clone_boxed(&self) -> Result<Box<dyn Indicator>, IndicatorError>;

    /// Subscribe to non-empty result notifications.
    fn subscribe_changed(&mut self, handler: ChangedHandler);

    /// Subscribe to reset notifications.
    fn subscribe_reset(&mut self, handler: ResetHandler);

    /// Stamp a payload with this indicator's identity.
    fn create_value(&self, payload: IndicatorPayload) -> IndicatorValue;
}

/// The pluggable half of an indicator: embedded core state plus the
/// pure transform. Everything else has a default.
pub trait IndicatorTransform {
    /// Access the embedded core state.
    fn core(&self) -> &IndicatorCore;

    /// Mutable access to the embedded core state.
    fn core_mut(&mut self) -> &mut IndicatorCore;

    /// The pure transform: input observation to result value. Results
    /// must be created through the own core (`create_value`), so they
    /// carry the right owner identity.
    fn on_process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError>;

    /// Formation predicate, consulted only while unformed. May read
    /// the container or delegate to child indicators.
    fn calc_is_formed(&self) -> bool {
        false
    }

    /// Warm-up requirement. Composites return the maximum over
    /// children.
    fn warmup_count(&self) -> usize {
        1
    }

    /// Scale classification.
    fn declared_measure(&self) -> IndicatorMeasure {
        IndicatorMeasure::Price
    }

    /// Declared input datum kind.
    fn declared_input(&self) -> ValueKind {
        ValueKind::Decimal
    }

    /// Declared result datum kind.
    fn declared_result(&self) -> ValueKind {
        ValueKind::Decimal
    }

    /// Reset hook. Composites forward the reset to their children
    /// here; the base engine does not know about children.
    fn on_reset(&mut self) {}

    /// Persist indicator-specific configuration keys.
    fn save_config(&self, _storage: &mut SettingsStorage) -> Result<(), SettingsError> {
        Ok(())
    }

    /// Restore indicator-specific configuration keys.
    fn load_config(&mut self, _storage: &SettingsStorage) -> Result<(), IndicatorError> {
        Ok(())
    }
}

impl<T> Indicator for T
where
    T: IndicatorTransform + Default + Send + 'static,
{
    fn id(&self) -> IndicatorId {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn set_name(&mut self, name: &str) -> Result<(), IndicatorError> {
        self.core_mut().set_name(name)
    }

    fn measure(&self) -> IndicatorMeasure {
        self.declared_measure()
    }

    fn input_kind(&self) -> ValueKind {
        self.declared_input()
    }

    fn result_kind(&self) -> ValueKind {
        self.declared_result()
    }

    fn warmup_period(&self) -> usize {
        self.warmup_count()
    }

    fn is_formed(&self) -> bool {
        // Monotonic once true: the cache is consulted first and only
        // an explicit reset clears it.
        if self.core().formed_cached() {
            return true;
        }
        let formed = self.calc_is_formed();
        if formed {
            self.core().mark_formed();
        }
        formed
    }

    fn container(&self) -> &IndicatorContainer {
        self.core().container()
    }

    fn set_history_limit(&mut self, limit: Option<usize>) {
        self.core_mut().container.set_max_count(limit);
    }

    fn process(&mut self, input: &IndicatorValue) -> Result<IndicatorValue, IndicatorError> {
        let mut result = self.on_process(input)?;

        // A result stamped with a foreign owner is a composition bug,
        // surfaced loudly rather than corrected.
        if result.indicator() != self.core().id() {
            return Err(IndicatorError::InvalidResult {
                indicator: self.core().name().to_string(),
                expected: self.core().id(),
                actual: result.indicator(),
            });
        }

        result.set_input(input.clone());

        if input.is_final() {
            result.set_final(true);
            self.core_mut()
                .container
                .add(input.clone(), result.clone());
        }

        if !result.is_empty() {
            self.core().notify_changed(input, &result);
        }

        Ok(result)
    }

    fn reset(&mut self) {
        self.on_reset();
        self.core_mut().clear_formed();
        self.core_mut().container.clear();
        self.core().notify_reset();
    }

    fn save(&self, storage: &mut SettingsStorage) -> Result<(), SettingsError> {
        storage.set("id", self.core().id())?;
        storage.set("name", self.core().name())?;
        self.save_config(storage)
    }

    fn load(&mut self, storage: &SettingsStorage) -> Result<(), IndicatorError> {
        let id: IndicatorId = storage.get("id").map_err(IndicatorError::from)?;
        let name: String = storage.get("name").map_err(IndicatorError::from)?;
        self.core_mut().set_id(id);
        self.core_mut().set_name(&name)?;
        self.load_config(storage)
    }

    fn clone_boxed(&self) -> Result<Box<dyn Indicator>, IndicatorError> {
        let mut storage = SettingsStorage::new();
        self.save(&mut storage)?;
        let mut copy = T::default();
        copy.load(&storage)?;
        Ok(Box::new(copy))
    }

    fn subscribe_changed(&mut self, handler: ChangedHandler) {
        self.core_mut().changed_handlers.push(handler);
    }

    fn subscribe_reset(&mut self, handler: ResetHandler) {
        self.core_mut().reset_handlers.push(handler);
    }

    fn create_value(&self, payload: IndicatorPayload) -> IndicatorValue {
        self.core().create_value(payload)
    }
}
