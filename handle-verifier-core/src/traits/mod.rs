//! Host integration abstract trait definition

mod message_surface;
mod settings_framework;

pub use message_surface::{HideOptions, MessageSurface};
pub use settings_framework::{FieldHooks, FieldRegistration, InMemorySettings, SettingsFramework};
