//! Lookup failure classification

use handle_verifier_provider::LookupError;

use crate::types::FailureReason;

/// Answer of the compatibility probe that follows a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerProbe {
    Compatible,
    Incompatible,
    /// The probe itself failed
    Unknown,
}

impl ServerProbe {
    pub fn from_result(result: &Result<bool, LookupError>) -> Self {
        match result {
            Ok(true) => Self::Compatible,
            Ok(false) => Self::Incompatible,
            Err(_) => Self::Unknown,
        }
    }
}

/// Maps a failed lookup plus the probe answer to the reason shown to the user.
///
/// An unknown probe counts as compatible so a flaky probe cannot hide the
/// lookup's own error behind "incompatible server".
pub fn classify_lookup_failure(error: &LookupError, probe: ServerProbe) -> FailureReason {
    if probe == ServerProbe::Incompatible {
        return FailureReason::NotCompatibleServer;
    }
    if error.is_not_found() {
        FailureReason::Nonexistent
    } else if error.is_transport() {
        FailureReason::NetworkError
    } else {
        FailureReason::CheckFailed
    }
}
