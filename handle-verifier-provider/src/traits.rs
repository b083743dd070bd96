use async_trait::async_trait;

use crate::error::Result;
use crate::handle::Handle;
use crate::types::AccountLookup;

/// Remote account directory.
///
/// Implementations answer the questions a handle validator needs, in the order
/// it asks them: does the account exist, and if not, is the server even one
/// that speaks the expected protocol.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Directory identifier, used in logs.
    fn id(&self) -> &'static str;

    /// Confirms the account exists.
    ///
    /// Fails with [`LookupError::AccountNotFound`](crate::LookupError::AccountNotFound)
    /// when the server positively reports the account as missing.
    async fn lookup_account(&self, handle: &Handle) -> Result<AccountLookup>;

    /// Whether `server_host` runs compatible software at all.
    ///
    /// `Ok(false)` is a definite "no"; `Err` means the question could not be answered.
    async fn is_compatible_server(&self, server_host: &str) -> Result<bool>;

    /// Fetches and caches the remote-follow template for `handle`.
    ///
    /// 默认实现只做一次查询，不缓存。
    async fn prefetch_subscribe_template(&self, handle: &Handle) -> Result<()> {
        self.lookup_account(handle).await.map(|_| ())
    }

    /// Template cached by an earlier prefetch, if any.
    async fn cached_subscribe_template(&self, _handle: &Handle) -> Option<String> {
        None
    }
}
