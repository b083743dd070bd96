//! Save-time validation
//!
//! Full check of the field: syntax, then the remote lookup, then (only if the
//! lookup failed) a compatibility probe of the server to tell "no such
//! account" apart from "not the right kind of server". The matching message
//! is shown *before* the error is returned to the caller.

use std::sync::Arc;

use handle_verifier_provider::{Handle, LookupError};

use crate::error::{CoreError, CoreResult};
use crate::services::classifier::{classify_lookup_failure, ServerProbe};
use crate::services::{ErrorDisplayTracker, ServiceContext};
use crate::traits::HideOptions;
use crate::types::{FailureReason, FieldValue, ValidatedHandle};

/// Save-time validator
#[derive(Clone)]
pub struct SlowValidator {
    ctx: Arc<ServiceContext>,
    display: Arc<ErrorDisplayTracker>,
}

impl SlowValidator {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, display: Arc<ErrorDisplayTracker>) -> Self {
        Self { ctx, display }
    }

    /// Validate a field value.
    ///
    /// - `Unset`: shows the "empty" warning but succeeds, so loading an
    ///   unconfigured field never fails.
    /// - `Stored`: trusted, clears any message and succeeds.
    /// - `Input`: full check; `Ok(Some(_))` only when the account exists.
    pub async fn validate(&self, value: &FieldValue) -> CoreResult<Option<ValidatedHandle>> {
        match value {
            FieldValue::Unset => {
                self.display.show(FailureReason::Empty, None);
                Ok(None)
            }
            FieldValue::Stored(handle) => {
                log::debug!("[{handle}] Stored value, skipping remote check");
                self.display.hide(HideOptions::default());
                Ok(None)
            }
            FieldValue::Input(raw) => self.validate_input(raw).await.map(Some),
        }
    }

    async fn validate_input(&self, raw: &str) -> CoreResult<ValidatedHandle> {
        if raw.trim().is_empty() {
            self.display.show(FailureReason::Empty, Some(raw));
            return Err(CoreError::Empty);
        }

        let handle = Handle::parse(raw).map_err(|e| {
            log::debug!("Rejected {raw:?}: {e}");
            self.display.show(FailureReason::InvalidSyntax, Some(raw));
            CoreError::InvalidSyntax(e)
        })?;

        match self.ctx.directory.lookup_account(&handle).await {
            Ok(lookup) => {
                log::debug!("[{handle}] Account confirmed as {}", lookup.subject);
                self.display.hide(HideOptions::default());
                Ok(ValidatedHandle { handle, lookup })
            }
            Err(err) => {
                let probe = self.probe(&handle).await;
                let reason = classify_lookup_failure(&err, probe);

                if err.is_expected() {
                    log::warn!("[{handle}] Lookup failed ({reason:?}, probe {probe:?}): {err}");
                } else {
                    log::error!("[{handle}] Lookup failed ({reason:?}, probe {probe:?}): {err}");
                }

                self.display.show(reason, Some(raw));
                Err(CoreError::Lookup(err))
            }
        }
    }

    /// Asks whether the handle's server is compatible; a failing probe is `Unknown`.
    async fn probe(&self, handle: &Handle) -> ServerProbe {
        let result: Result<bool, LookupError> = self
            .ctx
            .directory
            .is_compatible_server(handle.server_host())
            .await;

        if let Err(e) = &result {
            log::warn!(
                "[{}] Compatibility probe failed, assuming compatible: {e}",
                handle.server_host()
            );
        }
        ServerProbe::from_result(&result)
    }
}
