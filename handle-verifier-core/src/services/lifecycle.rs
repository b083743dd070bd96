//! Field lifecycle: load, validate, save and update hooks for the handle field.

use std::sync::Arc;

use async_trait::async_trait;
use handle_verifier_provider::Handle;

use crate::error::CoreResult;
use crate::services::{ErrorDisplayTracker, FastValidator, ServiceContext, SlowValidator};
use crate::traits::{FieldHooks, FieldRegistration, SettingsFramework};
use crate::types::{FieldValue, QuickCheck, ValidatedHandle};

/// Field id used when none is given
pub const DEFAULT_FIELD_ID: &str = "ownMastodon";

/// Binds both validators and the display tracker of one field to a settings
/// framework.
pub struct HandleFieldAdapter {
    field_id: String,
    ctx: Arc<ServiceContext>,
    display: Arc<ErrorDisplayTracker>,
    slow: SlowValidator,
    fast: FastValidator,
}

impl HandleFieldAdapter {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self::with_field_id(ctx, DEFAULT_FIELD_ID)
    }

    #[must_use]
    pub fn with_field_id(ctx: Arc<ServiceContext>, field_id: impl Into<String>) -> Self {
        let display = Arc::new(ErrorDisplayTracker::new(Arc::clone(&ctx.messages)));
        let slow = SlowValidator::new(Arc::clone(&ctx), Arc::clone(&display));
        let fast = FastValidator::new(Arc::clone(&display), slow.clone());

        Self {
            field_id: field_id.into(),
            ctx,
            display,
            slow,
            fast,
        }
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn display(&self) -> &ErrorDisplayTracker {
        &self.display
    }

    pub fn slow_validator(&self) -> &SlowValidator {
        &self.slow
    }

    pub fn fast_validator(&self) -> &FastValidator {
        &self.fast
    }

    /// Register the hooks with `framework`, asking for a validation pass after load.
    pub fn register(self: &Arc<Self>, framework: &dyn SettingsFramework) {
        let hooks: Arc<dyn FieldHooks> = Arc::clone(self) as Arc<dyn FieldHooks>;
        framework.register_field(
            &self.field_id,
            hooks,
            FieldRegistration {
                revalidate_after_load: true,
            },
        );
    }

    /// Warm the subscribe template cache in the background.
    fn spawn_prefetch(&self, handle: &Handle) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("[{handle}] No async runtime, subscribe template not prefetched");
            return;
        };

        let directory = Arc::clone(&self.ctx.directory);
        let handle = handle.clone();
        runtime.spawn(async move {
            match directory.prefetch_subscribe_template(&handle).await {
                Ok(()) => log::debug!("[{handle}] Subscribe template prefetched"),
                Err(e) => log::warn!("[{handle}] Subscribe template prefetch failed: {e}"),
            }
        });
    }
}

#[async_trait]
impl FieldHooks for HandleFieldAdapter {
    fn load(&self, stored: Option<&Handle>) -> String {
        stored.map(ToString::to_string).unwrap_or_default()
    }

    async fn validate(&self, value: FieldValue) -> CoreResult<Option<ValidatedHandle>> {
        self.slow.validate(&value).await
    }

    fn save(&self, value: &FieldValue, results: &[Option<ValidatedHandle>]) -> Option<Handle> {
        if let Some(validated) = results.iter().flatten().next() {
            self.spawn_prefetch(&validated.handle);
            return Some(validated.handle.clone());
        }

        match value {
            FieldValue::Stored(handle) => Some(handle.clone()),
            FieldValue::Unset | FieldValue::Input(_) => None,
        }
    }

    fn update(&self, raw: &str) -> QuickCheck {
        self.fast.quick_check(raw)
    }
}
