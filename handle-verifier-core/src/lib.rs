//! Handle Verifier Core Library
//!
//! Validation state machine for a single settings field holding a fediverse
//! account handle:
//! - Slow validation (save time): syntax, remote existence check, and a
//!   compatibility probe to explain *why* a lookup failed
//! - Fast validation (every keystroke): only ever clears a stale message
//! - Error display tracking: one visible message per field, hide before show
//! - Lifecycle adapter: load/save/update hooks for a settings framework
//!
//! The UI message surface and the settings framework are abstracted through
//! traits; the remote directory comes from `handle-verifier-provider`.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    ErrorDisplayTracker, FastValidator, HandleFieldAdapter, ServiceContext, SlowValidator,
};
pub use traits::{FieldHooks, InMemorySettings, MessageSurface, SettingsFramework};
