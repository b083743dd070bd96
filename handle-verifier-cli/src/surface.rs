//! Terminal message surface

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use handle_verifier_core::traits::HideOptions;
use handle_verifier_core::MessageSurface;

/// English text for a message key
pub fn message_text(key: &str) -> &'static str {
    match key {
        "accountEmpty" => "Enter your fediverse account, e.g. alice@mastodon.social",
        "accountInvalidSyntax" => "That does not look like user@server",
        "accountNotExist" => "No such account on that server",
        "accountNetworkError" => "Could not reach the server",
        "accountNotCompatibleServer" => "That server does not look like a Mastodon-compatible server",
        "accountCheckFailed" => "The account could not be checked",
        _ => "Unknown message",
    }
}

/// Prints banner changes to stdout and remembers the visible one.
#[derive(Default)]
pub struct TerminalSurface {
    visible: Mutex<Option<(&'static str, String)>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(severity label, key)` of the banner on screen
    pub fn visible(&self) -> Option<(&'static str, String)> {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn show(&self, label: &'static str, key: &str) {
        println!("{label}: {} [{key}]", message_text(key));
        let _ = std::io::stdout().flush();
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((label, key.to_string()));
    }

    fn hide(&self, label: &'static str, options: HideOptions) {
        let mut visible = self.visible.lock().unwrap_or_else(PoisonError::into_inner);
        if visible.as_ref().is_some_and(|(shown, _)| *shown == label) {
            *visible = None;
            if options.animate {
                println!("({label} cleared)");
            }
        }
    }
}

impl MessageSurface for TerminalSurface {
    fn show_warning(&self, key: &str) {
        self.show("warning", key);
    }

    fn show_error(&self, key: &str) {
        self.show("error", key);
    }

    fn hide_warning(&self, options: HideOptions) {
        self.hide("warning", options);
    }

    fn hide_error(&self, options: HideOptions) {
        self.hide("error", options);
    }
}
