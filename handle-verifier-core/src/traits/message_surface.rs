//! UI message surface abstract Trait

/// Options for hiding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideOptions {
    /// Play the hide transition. Off when a message is replaced by another one.
    pub animate: bool,
}

impl HideOptions {
    /// Hide without transition
    pub const IMMEDIATE: Self = Self { animate: false };
}

impl Default for HideOptions {
    fn default() -> Self {
        Self { animate: true }
    }
}

/// The banner area of the settings page.
///
/// Messages are identified by a stable key; translating the key into text is
/// the surface's job. The surface has one warning slot and one error slot.
///
/// The display tracker calls these methods while holding its own lock.
/// Implementations must not call back into the tracker (`current`,
/// `snapshot`, `show`, `hide`) from inside them or the call deadlocks.
pub trait MessageSurface: Send + Sync {
    /// Show the warning banner with the message for `key`
    fn show_warning(&self, key: &str);

    /// Show the error banner with the message for `key`
    fn show_error(&self, key: &str);

    /// Hide the warning banner
    fn hide_warning(&self, options: HideOptions);

    /// Hide the error banner
    fn hide_error(&self, options: HideOptions);
}
