//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error types
pub use handle_verifier_provider::{HandleParseError, LookupError};

/// Core layer error type
///
/// A failed save-time validation always carries the *original* cause; the
/// user-facing explanation has already been shown by the time this is returned.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The field is empty
    #[error("No account handle entered")]
    Empty,

    /// The input is not `user@server`
    #[error("Invalid account handle: {0}")]
    InvalidSyntax(#[from] HandleParseError),

    /// The remote lookup failed (missing account, unreachable server, ...)
    #[error("{0}")]
    Lookup(#[from] LookupError),

    /// No field registered under this id
    #[error("Field not registered: {0}")]
    FieldNotRegistered(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, account does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Empty | Self::InvalidSyntax(_) => true,
            Self::Lookup(e) => e.is_expected(),
            Self::FieldNotRegistered(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
