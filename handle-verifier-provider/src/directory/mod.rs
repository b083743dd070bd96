//! Fediverse directory over HTTP

mod instance;
mod webfinger;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::sync::RwLock;

use crate::error::{LookupError, Result};
use crate::handle::Handle;
use crate::traits::AccountDirectory;
use crate::types::{AccountLookup, DirectoryConfig};

/// [`AccountDirectory`] backed by WebFinger and the Mastodon instance endpoint.
pub struct FediverseDirectory {
    pub(crate) client: Client,
    pub(crate) config: DirectoryConfig,
    /// 订阅模板缓存 (handle -> template)
    pub(crate) templates: RwLock<HashMap<Handle, String>>,
}

impl FediverseDirectory {
    /// Builds the directory and its HTTP client from `config`.
    pub fn new(config: DirectoryConfig) -> Result<Self> {
        let client = create_http_client(&config)?;
        Ok(Self {
            client,
            config,
            templates: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// `{scheme}://{host}{path}`
    pub(crate) fn url(&self, host: &str, path: &str) -> Result<Url> {
        let raw = format!("{}://{host}{path}", self.config.scheme);
        Url::parse(&raw).map_err(|e| LookupError::InvalidHandle {
            host: host.to_string(),
            detail: format!("Cannot build URL {raw}: {e}"),
        })
    }
}

/// 创建带超时配置的 HTTP Client
fn create_http_client(config: &DirectoryConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| LookupError::Unknown {
            host: "localhost".to_string(),
            status: None,
            raw_message: format!("Failed to create HTTP client: {e}"),
        })
}

#[async_trait]
impl AccountDirectory for FediverseDirectory {
    fn id(&self) -> &'static str {
        "fediverse"
    }

    async fn lookup_account(&self, handle: &Handle) -> Result<AccountLookup> {
        let lookup = self.webfinger(handle).await?;
        if let Some(template) = &lookup.subscribe_template {
            self.templates
                .write()
                .await
                .insert(handle.clone(), template.clone());
        }
        Ok(lookup)
    }

    async fn is_compatible_server(&self, server_host: &str) -> Result<bool> {
        self.probe_instance(server_host).await
    }

    async fn prefetch_subscribe_template(&self, handle: &Handle) -> Result<()> {
        if self.templates.read().await.contains_key(handle) {
            log::debug!("[{}] Subscribe template already cached", handle.server_host());
            return Ok(());
        }

        let lookup = self.lookup_account(handle).await?;
        if lookup.subscribe_template.is_none() {
            log::warn!(
                "[{}] No subscribe template advertised for {handle}",
                handle.server_host()
            );
        }
        Ok(())
    }

    async fn cached_subscribe_template(&self, handle: &Handle) -> Option<String> {
        self.templates.read().await.get(handle).cloned()
    }
}
