//! Shared HTTP plumbing for the directory
//!
//! Endpoints build their own `RequestBuilder`; this module sends it, logs the
//! exchange and sorts failures into two groups:
//! - **transport failures** become a [`LookupError`] here (timeouts, connection
//!   errors, HTTP 429, HTTP 502-504) and may be retried;
//! - **every other answer** comes back as a [`RawReply`], because only the
//!   endpoint knows what a 404 means for it.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::LookupError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Longest wait honoured from a `Retry-After` header
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Backoff starts here and doubles per attempt
const BASE_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 10_000;

/// Status and body of an HTTP answer that was not a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Decode the body as JSON, `ParseError` on failure.
    pub fn json<T: DeserializeOwned>(&self, host: &str) -> Result<T, LookupError> {
        HttpUtils::parse_json(&self.body, host)
    }
}

/// HTTP helpers used by every endpoint
pub struct HttpUtils;

impl HttpUtils {
    /// Send one request.
    ///
    /// `host` and `endpoint` are only used for logs and error context.
    pub async fn execute_request(
        request: RequestBuilder,
        host: &str,
        endpoint: &str,
    ) -> Result<RawReply, LookupError> {
        log::debug!("[{host}] GET {endpoint}");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(host, &e))?;

        let status = response.status().as_u16();
        log::debug!("[{host}] HTTP {status} from {endpoint}");

        match status {
            429 => {
                let retry_after = retry_after_secs(&response);
                let body = response.text().await.unwrap_or_default();
                log::warn!("[{host}] Rate limited, retry_after={retry_after:?}");
                Err(LookupError::RateLimited {
                    host: host.to_string(),
                    retry_after,
                    raw_message: (!body.is_empty()).then(|| truncate_for_log(&body)),
                })
            }
            // the proxy in front of the server could not reach it
            502..=504 => {
                let body = response.text().await.unwrap_or_default();
                log::warn!("[{host}] Gateway error HTTP {status}");
                Err(LookupError::NetworkError {
                    host: host.to_string(),
                    detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
                })
            }
            _ => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| LookupError::NetworkError {
                        host: host.to_string(),
                        detail: format!("Reading the body failed: {e}"),
                    })?;
                log::debug!("[{host}] Body: {}", truncate_for_log(&body));
                Ok(RawReply { status, body })
            }
        }
    }

    /// Decode `body` as JSON.
    pub fn parse_json<T: DeserializeOwned>(body: &str, host: &str) -> Result<T, LookupError> {
        serde_json::from_str(body).map_err(|e| {
            log::error!(
                "[{host}] Undecodable JSON ({e}): {}",
                truncate_for_log(body)
            );
            LookupError::ParseError {
                host: host.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// [`execute_request`](Self::execute_request) with up to `max_retries`
    /// retries of retryable failures.
    ///
    /// Waits 100ms, 200ms, 400ms, ... (at most 10s) between attempts, or the
    /// server's `Retry-After` (at most 30s) after a 429.
    pub async fn execute_request_with_retry(
        request: RequestBuilder,
        host: &str,
        endpoint: &str,
        max_retries: u32,
    ) -> Result<RawReply, LookupError> {
        let mut attempt = 0;
        loop {
            // a builder is consumed by send(); streaming bodies cannot be cloned
            let Some(this_try) = request.try_clone() else {
                log::warn!("[{host}] Request is not clonable, sending once");
                return Self::execute_request(request, host, endpoint).await;
            };

            match Self::execute_request(this_try, host, endpoint).await {
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    attempt += 1;
                    log::warn!(
                        "[{host}] Attempt {attempt}/{} failed, next in {}ms: {e}",
                        max_retries + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

fn transport_error(host: &str, e: &reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout {
            host: host.to_string(),
            detail: e.to_string(),
        }
    } else {
        LookupError::NetworkError {
            host: host.to_string(),
            detail: e.to_string(),
        }
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn retry_delay(error: &LookupError, attempt: u32) -> Duration {
    match error {
        LookupError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS)),
        _ => backoff_delay(attempt),
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    // 2^20 * 100ms is far past the cap already
    let factor = 1_u64 << attempt.min(20);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor).min(MAX_BACKOFF_MS))
}
