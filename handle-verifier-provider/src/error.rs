use serde::{Deserialize, Serialize};

/// Unified error type for all remote directory operations.
///
/// Each variant includes a `host` field identifying the server that produced the
/// error, plus variant-specific context. All variants are serializable for structured
/// error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): server rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum LookupError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    ///
    /// This is a transient error and is automatically retried.
    NetworkError {
        /// Server that produced the error.
        host: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    ///
    /// This is a transient error and is automatically retried.
    Timeout {
        /// Server that produced the error.
        host: String,
        /// Error details.
        detail: String,
    },

    /// The server rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Server that produced the error.
        host: String,
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Response body, if available.
        raw_message: Option<String>,
    },

    /// The server answered, but it has no account under the requested handle.
    AccountNotFound {
        /// Server that produced the error.
        host: String,
        /// The handle that was looked up, in `user@host` form.
        handle: String,
        /// Response body, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the server's response.
    ParseError {
        /// Server that produced the error.
        host: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// A request could not be built for the given handle or host.
    InvalidHandle {
        /// Server part of the offending input.
        host: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// An unexpected HTTP answer.
    ///
    /// This is a catch-all for status codes not mapped to a specific variant.
    Unknown {
        /// Server that produced the error.
        host: String,
        /// HTTP status code, if a response was received.
        status: Option<u16>,
        /// Raw response text.
        raw_message: String,
    },
}

impl LookupError {
    /// The server this error relates to.
    pub fn host(&self) -> &str {
        match self {
            Self::NetworkError { host, .. }
            | Self::Timeout { host, .. }
            | Self::RateLimited { host, .. }
            | Self::AccountNotFound { host, .. }
            | Self::ParseError { host, .. }
            | Self::InvalidHandle { host, .. }
            | Self::Unknown { host, .. } => host,
        }
    }

    /// Whether the server positively reported the account as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound { .. })
    }

    /// Whether the failure happened at the transport layer (fetch failed,
    /// connection reset, timed out) rather than in the server's answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }

    /// Whether a retry has a reasonable chance of succeeding.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound { .. } | Self::InvalidHandle { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { host, detail } => {
                write!(f, "[{host}] Network error: {detail}")
            }
            Self::Timeout { host, detail } => {
                write!(f, "[{host}] Request timeout: {detail}")
            }
            Self::RateLimited {
                host, retry_after, ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{host}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{host}] Rate limited")
                }
            }
            Self::AccountNotFound { host, handle, .. } => {
                write!(f, "[{host}] Account '{handle}' not found")
            }
            Self::ParseError { host, detail } => {
                write!(f, "[{host}] Parse error: {detail}")
            }
            Self::InvalidHandle { host, detail } => {
                write!(f, "[{host}] Invalid handle: {detail}")
            }
            Self::Unknown {
                host,
                status,
                raw_message,
            } => {
                if let Some(status) = status {
                    write!(f, "[{host}] HTTP {status}: {raw_message}")
                } else {
                    write!(f, "[{host}] {raw_message}")
                }
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Convenience type alias for `Result<T, LookupError>`.
pub type Result<T> = std::result::Result<T, LookupError>;
