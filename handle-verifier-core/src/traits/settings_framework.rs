//! Settings framework abstract Trait

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use handle_verifier_provider::Handle;

use crate::error::{CoreError, CoreResult};
use crate::types::{FieldValue, QuickCheck, ValidatedHandle};

/// Hook points a settings framework calls for one field.
#[async_trait]
pub trait FieldHooks: Send + Sync {
    /// Load override: stored value -> text shown in the input
    fn load(&self, stored: Option<&Handle>) -> String;

    /// Save-time validator. `Err` blocks the save.
    async fn validate(&self, value: FieldValue) -> CoreResult<Option<ValidatedHandle>>;

    /// Save override.
    ///
    /// `results` are the outputs of the save-time validators, in the order they
    /// ran. Returns the value to persist.
    fn save(&self, value: &FieldValue, results: &[Option<ValidatedHandle>]) -> Option<Handle>;

    /// Update-time (per-keystroke) validator
    fn update(&self, raw: &str) -> QuickCheck;
}

/// Registration directives for a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldRegistration {
    /// Run all save-time validators once after the initial load.
    /// A failure of that pass never aborts the load.
    pub revalidate_after_load: bool,
}

/// Settings Framework Trait
///
/// Implemented by the host; the field adapter registers itself through it.
pub trait SettingsFramework: Send + Sync {
    /// Register the hooks of one field
    fn register_field(
        &self,
        field_id: &str,
        hooks: Arc<dyn FieldHooks>,
        registration: FieldRegistration,
    );
}

struct RegisteredField {
    hooks: Arc<dyn FieldHooks>,
    registration: FieldRegistration,
    stored: Option<Handle>,
    input: String,
}

/// In-memory settings framework
///
/// Default implementation: keeps the stored value and the current input text
/// of every registered field, and drives the hooks the way a settings page does.
#[derive(Default)]
pub struct InMemorySettings {
    fields: Mutex<HashMap<String, RegisteredField>>,
}

impl InMemorySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RegisteredField>> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hooks(&self, field_id: &str) -> CoreResult<(Arc<dyn FieldHooks>, FieldRegistration)> {
        self.lock()
            .get(field_id)
            .map(|f| (Arc::clone(&f.hooks), f.registration))
            .ok_or_else(|| CoreError::FieldNotRegistered(field_id.to_string()))
    }

    /// Initial load: fill the input from `stored`, then run the forced
    /// validation pass if the field asked for one.
    ///
    /// Returns the input text.
    pub async fn load(&self, field_id: &str, stored: Option<Handle>) -> CoreResult<String> {
        let (hooks, registration) = self.hooks(field_id)?;
        let text = hooks.load(stored.as_ref());

        if let Some(field) = self.lock().get_mut(field_id) {
            field.stored.clone_from(&stored);
            field.input.clone_from(&text);
        }

        if registration.revalidate_after_load {
            if let Err(e) = hooks.validate(FieldValue::from(stored)).await {
                log::debug!("[{field_id}] Validation after load failed: {e}");
            }
        }

        Ok(text)
    }

    /// The user changed the input text.
    pub fn edit(&self, field_id: &str, raw: &str) -> CoreResult<QuickCheck> {
        let (hooks, _) = self.hooks(field_id)?;
        if let Some(field) = self.lock().get_mut(field_id) {
            field.input = raw.to_string();
        }
        Ok(hooks.update(raw))
    }

    /// The user asked to save: validate the current input, then persist.
    pub async fn save(&self, field_id: &str) -> CoreResult<Option<Handle>> {
        let (hooks, _) = self.hooks(field_id)?;
        let input = self.input(field_id)?;

        let value = FieldValue::Input(input);
        let results = vec![hooks.validate(value.clone()).await?];
        let stored = hooks.save(&value, &results);

        if let Some(field) = self.lock().get_mut(field_id) {
            field.stored.clone_from(&stored);
        }
        log::info!(
            "[{field_id}] Saved {}",
            stored.as_ref().map_or_else(|| "<unset>".to_string(), ToString::to_string)
        );
        Ok(stored)
    }

    /// Current input text
    pub fn input(&self, field_id: &str) -> CoreResult<String> {
        self.lock()
            .get(field_id)
            .map(|f| f.input.clone())
            .ok_or_else(|| CoreError::FieldNotRegistered(field_id.to_string()))
    }

    /// Last persisted value
    pub fn stored(&self, field_id: &str) -> CoreResult<Option<Handle>> {
        self.lock()
            .get(field_id)
            .map(|f| f.stored.clone())
            .ok_or_else(|| CoreError::FieldNotRegistered(field_id.to_string()))
    }
}

impl SettingsFramework for InMemorySettings {
    fn register_field(
        &self,
        field_id: &str,
        hooks: Arc<dyn FieldHooks>,
        registration: FieldRegistration,
    ) {
        log::debug!("Registering field {field_id} ({registration:?})");
        self.lock().insert(
            field_id.to_string(),
            RegisteredField {
                hooks,
                registration,
                stored: None,
                input: String::new(),
            },
        );
    }
}
