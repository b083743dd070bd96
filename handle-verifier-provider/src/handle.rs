//! Handle syntax: `local@server.example`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a string is not a handle.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum HandleParseError {
    #[error("Handle is empty")]
    Empty,

    #[error("Handle must contain an '@' between user and server")]
    MissingSeparator,

    #[error("Handle contains more than one '@' separator")]
    TooManySeparators,

    #[error("User part of the handle is empty")]
    EmptyLocalPart,

    #[error("Server part of the handle is empty")]
    EmptyServerHost,

    #[error("User part contains an invalid character: {0:?}")]
    InvalidLocalPart(char),

    #[error("Server part is not a valid host name: {0}")]
    InvalidServerHost(String),
}

/// A parsed `local@server` account handle.
///
/// Only constructible through [`Handle::parse`] (or deserialization, which
/// runs the same checks), so every value satisfies
/// `Handle::parse(&h.to_string()) == Ok(h)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredHandle", into = "StoredHandle")]
pub struct Handle {
    local_part: String,
    server_host: String,
}

/// Stored shape of a handle.
#[derive(Serialize, Deserialize)]
struct StoredHandle {
    username: String,
    server: String,
}

impl Handle {
    /// Parses `local@host`, tolerating a leading `@` or `acct:` and surrounding whitespace.
    ///
    /// The host is lowercased; the local part is kept as typed.
    pub fn parse(raw: &str) -> Result<Self, HandleParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HandleParseError::Empty);
        }

        let body = trimmed
            .strip_prefix("acct:")
            .or_else(|| trimmed.strip_prefix('@'))
            .unwrap_or(trimmed);

        let mut parts = body.split('@');
        let (Some(local), Some(host)) = (parts.next(), parts.next()) else {
            return Err(HandleParseError::MissingSeparator);
        };
        if parts.next().is_some() {
            return Err(HandleParseError::TooManySeparators);
        }

        Self::from_parts(local, host)
    }

    /// Builds a handle from its two halves, applying the same checks as [`Handle::parse`].
    pub fn from_parts(local_part: &str, server_host: &str) -> Result<Self, HandleParseError> {
        validate_local_part(local_part)?;
        let server_host = normalize_server_host(server_host)?;

        Ok(Self {
            local_part: local_part.to_string(),
            server_host,
        })
    }

    /// User name on the remote server.
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Server host name, possibly with a `:port` suffix.
    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    /// The WebFinger resource identifier, `acct:local@host`.
    pub fn acct_uri(&self) -> String {
        format!("acct:{self}")
    }
}

fn validate_local_part(local: &str) -> Result<(), HandleParseError> {
    if local.is_empty() {
        return Err(HandleParseError::EmptyLocalPart);
    }
    if let Some(c) = local
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '@' | '/' | '?' | '#' | ':'))
    {
        return Err(HandleParseError::InvalidLocalPart(c));
    }
    Ok(())
}

fn normalize_server_host(host: &str) -> Result<String, HandleParseError> {
    if host.is_empty() {
        return Err(HandleParseError::EmptyServerHost);
    }
    let invalid = || HandleParseError::InvalidServerHost(host.to_string());

    let (name, port) = match host.rsplit_once(':') {
        Some((name, port)) => (name, Some(port)),
        None => (host, None),
    };

    if let Some(port) = port {
        if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if port.parse::<u16>().is_err() {
            return Err(invalid());
        }
    }

    let labels_ok = name.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return Err(invalid());
    }

    Ok(host.to_ascii_lowercase())
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.server_host)
    }
}

impl FromStr for Handle {
    type Err = HandleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<StoredHandle> for Handle {
    type Error = HandleParseError;

    fn try_from(stored: StoredHandle) -> Result<Self, Self::Error> {
        Self::from_parts(&stored.username, &stored.server)
    }
}

impl From<Handle> for StoredHandle {
    fn from(handle: Handle) -> Self {
        Self {
            username: handle.local_part,
            server: handle.server_host,
        }
    }
}
