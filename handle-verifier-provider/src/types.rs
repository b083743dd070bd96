//! Directory data types and configuration.

use serde::{Deserialize, Serialize};

use crate::{PROFILE_PAGE_REL, SUBSCRIBE_REL};

// ============ WebFinger ============

/// A link entry of a WebFinger (RFC 7033) JRD document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFingerLink {
    pub rel: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// URI template, used by the subscribe relation (`{uri}` placeholder).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// A WebFinger JRD document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFingerResponse {
    pub subject: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub links: Vec<WebFingerLink>,
}

impl WebFingerResponse {
    /// First link with the given relation.
    pub fn find_link(&self, rel: &str) -> Option<&WebFingerLink> {
        self.links.iter().find(|l| l.rel == rel)
    }
}

// ============ Lookup result ============

/// Proof that an account exists, as returned by [`crate::AccountDirectory::lookup_account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLookup {
    /// Canonical subject reported by the server (usually `acct:user@host`).
    pub subject: String,
    /// Alternative identifiers (actor URL, profile URL).
    pub aliases: Vec<String>,
    /// HTML profile page, when advertised.
    pub profile_url: Option<String>,
    /// Remote-follow template with a `{uri}` placeholder, when advertised.
    pub subscribe_template: Option<String>,
}

impl From<WebFingerResponse> for AccountLookup {
    fn from(jrd: WebFingerResponse) -> Self {
        let profile_url = jrd
            .find_link(PROFILE_PAGE_REL)
            .and_then(|l| l.href.clone());
        let subscribe_template = jrd
            .find_link(SUBSCRIBE_REL)
            .and_then(|l| l.template.clone());

        Self {
            subject: jrd.subject,
            aliases: jrd.aliases,
            profile_url,
            subscribe_template,
        }
    }
}

// ============ Instance probe ============

/// The subset of `/api/v1/instance` the compatibility probe looks at.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstanceInfo {
    #[serde(default)]
    pub version: Option<String>,
}

impl InstanceInfo {
    pub fn is_compatible(&self) -> bool {
        self.version.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

// ============ Configuration ============

/// HTTP behaviour of [`crate::FediverseDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// URL scheme used to reach servers. Only tests and local setups use `http`.
    pub scheme: String,
    /// 连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// Retries for transient failures (0 disables retrying).
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_retries: 2,
            user_agent: concat!("handle-verifier/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
