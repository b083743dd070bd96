//! Field values and validation outcomes

use handle_verifier_provider::{AccountLookup, Handle};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::CoreResult;

/// Value handed to the save-time validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The field has never been configured
    Unset,
    /// Loaded from storage; trusted and never re-validated
    Stored(Handle),
    /// Raw text from the input
    Input(String),
}

impl From<Option<Handle>> for FieldValue {
    fn from(stored: Option<Handle>) -> Self {
        stored.map_or(Self::Unset, Self::Stored)
    }
}

/// A handle that passed the full remote check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedHandle {
    pub handle: Handle,
    pub lookup: AccountLookup,
}

/// What a per-keystroke check did.
#[derive(Debug)]
pub enum QuickCheck {
    /// Display state untouched
    Unchanged,
    /// A stale message was hidden
    Cleared,
    /// The input equals the last rejected value; a full validation was started
    Revalidating(JoinHandle<CoreResult<Option<ValidatedHandle>>>),
}

impl QuickCheck {
    /// Waits for a started re-validation; immediate for the other outcomes.
    pub async fn settle(self) -> Option<CoreResult<Option<ValidatedHandle>>> {
        match self {
            Self::Revalidating(task) => match task.await {
                Ok(result) => Some(result),
                Err(e) => {
                    log::error!("Re-validation task failed: {e}");
                    None
                }
            },
            Self::Unchanged | Self::Cleared => None,
        }
    }
}
