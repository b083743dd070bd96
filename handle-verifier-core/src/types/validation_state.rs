//! Validation state and failure reasons

use serde::{Deserialize, Serialize};

/// How a failure is rendered by the message surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Why the field is currently not acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureReason {
    /// Nothing entered
    Empty,
    /// Not of the form `user@server`
    InvalidSyntax,
    /// The server says the account does not exist
    Nonexistent,
    /// The server could not be reached
    NetworkError,
    /// The server does not speak the expected protocol
    NotCompatibleServer,
    /// Any other verification failure
    CheckFailed,
}

impl FailureReason {
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::InvalidSyntax,
        Self::Nonexistent,
        Self::NetworkError,
        Self::NotCompatibleServer,
        Self::CheckFailed,
    ];

    /// Fixed message key looked up by the message surface.
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Empty => "accountEmpty",
            Self::InvalidSyntax => "accountInvalidSyntax",
            Self::Nonexistent => "accountNotExist",
            Self::NetworkError => "accountNetworkError",
            Self::NotCompatibleServer => "accountNotCompatibleServer",
            Self::CheckFailed => "accountCheckFailed",
        }
    }

    /// An empty field is only a warning; everything else is an error.
    pub const fn severity(self) -> Severity {
        match self {
            Self::Empty => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// What the user currently sees for the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationState {
    /// No message shown
    #[default]
    None,
    Empty,
    InvalidSyntax,
    Nonexistent,
    NetworkError,
    NotCompatibleServer,
    CheckFailed,
}

impl ValidationState {
    /// The failure behind this state, `None` for [`ValidationState::None`].
    pub const fn failure(self) -> Option<FailureReason> {
        match self {
            Self::None => None,
            Self::Empty => Some(FailureReason::Empty),
            Self::InvalidSyntax => Some(FailureReason::InvalidSyntax),
            Self::Nonexistent => Some(FailureReason::Nonexistent),
            Self::NetworkError => Some(FailureReason::NetworkError),
            Self::NotCompatibleServer => Some(FailureReason::NotCompatibleServer),
            Self::CheckFailed => Some(FailureReason::CheckFailed),
        }
    }

    pub const fn is_error(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<FailureReason> for ValidationState {
    fn from(reason: FailureReason) -> Self {
        match reason {
            FailureReason::Empty => Self::Empty,
            FailureReason::InvalidSyntax => Self::InvalidSyntax,
            FailureReason::Nonexistent => Self::Nonexistent,
            FailureReason::NetworkError => Self::NetworkError,
            FailureReason::NotCompatibleServer => Self::NotCompatibleServer,
            FailureReason::CheckFailed => Self::CheckFailed,
        }
    }
}

/// Shown state plus the last input known to be rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySnapshot {
    pub state: ValidationState,
    pub last_rejected: Option<String>,
}
