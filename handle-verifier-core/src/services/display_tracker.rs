//! Error display tracking
//!
//! One tracker per field. It is the only writer of the field's
//! [`ValidationState`] and keeps the message surface in sync with it: at most
//! one banner is visible, and it always matches the tracked state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::traits::{HideOptions, MessageSurface};
use crate::types::{DisplaySnapshot, FailureReason, Severity, ValidationState};

/// Single-slot record of the message currently shown for a field.
pub struct ErrorDisplayTracker {
    messages: Arc<dyn MessageSurface>,
    state: Mutex<DisplaySnapshot>,
}

impl ErrorDisplayTracker {
    #[must_use]
    pub fn new(messages: Arc<dyn MessageSurface>) -> Self {
        Self {
            messages,
            state: Mutex::new(DisplaySnapshot::default()),
        }
    }

    // The lock is never held across an await point; poisoning can only come
    // from a panicking surface and the snapshot is still consistent then.
    fn lock(&self) -> MutexGuard<'_, DisplaySnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hide the shown message, if any, and reset the state to `None`.
    pub fn hide(&self, options: HideOptions) {
        let mut state = self.lock();
        self.hide_locked(&mut state, options);
    }

    fn hide_locked(&self, state: &mut DisplaySnapshot, options: HideOptions) {
        let Some(shown) = state.state.failure() else {
            return;
        };
        match shown.severity() {
            Severity::Warning => self.messages.hide_warning(options),
            Severity::Error => self.messages.hide_error(options),
        }
        log::debug!("Hid {shown:?} (animate={})", options.animate);
        state.state = ValidationState::None;
    }

    /// Replace whatever is shown with the message for `reason`.
    ///
    /// `rejected` becomes the last rejected value; `None` forgets the previous one.
    pub fn show(&self, reason: FailureReason, rejected: Option<&str>) {
        let mut state = self.lock();
        self.hide_locked(&mut state, HideOptions::IMMEDIATE);

        let key = reason.message_key();
        match reason.severity() {
            Severity::Warning => self.messages.show_warning(key),
            Severity::Error => self.messages.show_error(key),
        }
        log::debug!("Showing {reason:?} ({key})");

        state.state = reason.into();
        state.last_rejected = rejected.map(ToString::to_string);
    }

    pub fn current(&self) -> ValidationState {
        self.lock().state
    }

    pub fn last_rejected(&self) -> Option<String> {
        self.lock().last_rejected.clone()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.lock().clone()
    }

    /// Cache `value` as known-bad without touching what is shown.
    pub fn remember_rejected(&self, value: &str) {
        self.lock().last_rejected = Some(value.to_string());
    }

    pub fn clear_rejected(&self) {
        self.lock().last_rejected = None;
    }
}
