//! Per-keystroke validation
//!
//! Never shows a new message. It only clears a stale one once the input no
//! longer deserves it. The single exception is re-entry: when nothing is shown
//! and the user types back the exact value that was last rejected, a full
//! save-time validation is started so the message comes back.

use std::sync::Arc;

use handle_verifier_provider::Handle;

use crate::services::{ErrorDisplayTracker, SlowValidator};
use crate::traits::HideOptions;
use crate::types::{FieldValue, QuickCheck, ValidationState};

#[derive(Clone)]
pub struct FastValidator {
    display: Arc<ErrorDisplayTracker>,
    slow: SlowValidator,
}

impl FastValidator {
    #[must_use]
    pub fn new(display: Arc<ErrorDisplayTracker>, slow: SlowValidator) -> Self {
        Self { display, slow }
    }

    /// Check `raw` after an edit. Never fails.
    pub fn quick_check(&self, raw: &str) -> QuickCheck {
        let snapshot = self.display.snapshot();

        match snapshot.state {
            ValidationState::None => {
                if snapshot.last_rejected.as_deref() == Some(raw) {
                    return self.revalidate(raw);
                }
                QuickCheck::Unchanged
            }
            ValidationState::Empty => {
                if raw.trim().is_empty() {
                    QuickCheck::Unchanged
                } else {
                    self.clear()
                }
            }
            ValidationState::InvalidSyntax => {
                if Handle::parse(raw).is_ok() {
                    self.clear()
                } else {
                    self.display.remember_rejected(raw);
                    QuickCheck::Unchanged
                }
            }
            ValidationState::Nonexistent
            | ValidationState::NetworkError
            | ValidationState::NotCompatibleServer
            | ValidationState::CheckFailed => self.clear(),
        }
    }

    fn clear(&self) -> QuickCheck {
        self.display.hide(HideOptions::default());
        QuickCheck::Cleared
    }

    // 先清除缓存再启动任务，避免任务记录的新值被覆盖
    fn revalidate(&self, raw: &str) -> QuickCheck {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime, skipping re-validation of {raw:?}");
            return QuickCheck::Unchanged;
        };

        log::debug!("Input is back to rejected value {raw:?}, re-validating");
        self.display.clear_rejected();

        let slow = self.slow.clone();
        let value = FieldValue::Input(raw.to_string());
        QuickCheck::Revalidating(runtime.spawn(async move { slow.validate(&value).await }))
    }
}
