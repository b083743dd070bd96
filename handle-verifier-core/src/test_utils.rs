//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use handle_verifier_provider::{AccountDirectory, AccountLookup, Handle, LookupError};
use tokio::sync::RwLock;

use crate::services::{HandleFieldAdapter, ServiceContext};
use crate::traits::{HideOptions, MessageSurface};
use crate::types::Severity;

// ===== MockDirectory =====

/// Accounts and probe answers are configured per handle / host.
/// Unknown accounts are "not found", unknown hosts are compatible.
pub struct MockDirectory {
    accounts: RwLock<HashMap<String, Result<AccountLookup, LookupError>>>,
    probes: RwLock<HashMap<String, Result<bool, LookupError>>>,
    prefetch_error: RwLock<Option<LookupError>>,
    pub lookup_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
    pub prefetch_calls: AtomicUsize,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            probes: RwLock::new(HashMap::new()),
            prefetch_error: RwLock::new(None),
            lookup_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
            prefetch_calls: AtomicUsize::new(0),
        }
    }

    pub async fn add_account(&self, handle: &str) {
        self.accounts
            .write()
            .await
            .insert(handle.to_string(), Ok(test_lookup(handle)));
    }

    pub async fn set_lookup_error(&self, handle: &str, err: LookupError) {
        self.accounts
            .write()
            .await
            .insert(handle.to_string(), Err(err));
    }

    pub async fn set_probe(&self, host: &str, answer: Result<bool, LookupError>) {
        self.probes.write().await.insert(host.to_string(), answer);
    }

    pub async fn set_prefetch_error(&self, err: Option<LookupError>) {
        *self.prefetch_error.write().await = err;
    }

    pub fn lookups(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn prefetches(&self) -> usize {
        self.prefetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountDirectory for MockDirectory {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn lookup_account(&self, handle: &Handle) -> Result<AccountLookup, LookupError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .read()
            .await
            .get(&handle.to_string())
            .cloned()
            .unwrap_or_else(|| {
                Err(LookupError::AccountNotFound {
                    host: handle.server_host().to_string(),
                    handle: handle.to_string(),
                    raw_message: None,
                })
            })
    }

    async fn is_compatible_server(&self, server_host: &str) -> Result<bool, LookupError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.probes
            .read()
            .await
            .get(server_host)
            .cloned()
            .unwrap_or(Ok(true))
    }

    async fn prefetch_subscribe_template(&self, _handle: &Handle) -> Result<(), LookupError> {
        self.prefetch_calls.fetch_add(1, Ordering::SeqCst);
        match self.prefetch_error.read().await.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ===== RecordingSurface =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    ShowWarning(String),
    ShowError(String),
    HideWarning { animate: bool },
    HideError { animate: bool },
}

#[derive(Default)]
struct SurfaceState {
    events: Vec<SurfaceEvent>,
    warning: Option<String>,
    error: Option<String>,
    /// show 时已有横幅可见的次数
    overlaps: usize,
}

/// Message surface that records every call and tracks what is visible.
#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut SurfaceState) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.with(|s| s.events.clone())
    }

    /// The banner currently visible, if any.
    pub fn visible(&self) -> Option<(Severity, String)> {
        self.with(|s| match (&s.warning, &s.error) {
            (Some(w), None) => Some((Severity::Warning, w.clone())),
            (None, Some(e)) => Some((Severity::Error, e.clone())),
            _ => None,
        })
    }

    pub fn visible_count(&self) -> usize {
        self.with(|s| usize::from(s.warning.is_some()) + usize::from(s.error.is_some()))
    }

    pub fn overlaps(&self) -> usize {
        self.with(|s| s.overlaps)
    }
}

impl MessageSurface for RecordingSurface {
    fn show_warning(&self, key: &str) {
        self.with(|s| {
            if s.warning.is_some() || s.error.is_some() {
                s.overlaps += 1;
            }
            s.warning = Some(key.to_string());
            s.events.push(SurfaceEvent::ShowWarning(key.to_string()));
        });
    }

    fn show_error(&self, key: &str) {
        self.with(|s| {
            if s.warning.is_some() || s.error.is_some() {
                s.overlaps += 1;
            }
            s.error = Some(key.to_string());
            s.events.push(SurfaceEvent::ShowError(key.to_string()));
        });
    }

    fn hide_warning(&self, options: HideOptions) {
        self.with(|s| {
            s.warning = None;
            s.events.push(SurfaceEvent::HideWarning {
                animate: options.animate,
            });
        });
    }

    fn hide_error(&self, options: HideOptions) {
        self.with(|s| {
            s.error = None;
            s.events.push(SurfaceEvent::HideError {
                animate: options.animate,
            });
        });
    }
}

// ===== 工厂方法 =====

/// `AccountLookup` as a Mastodon server would report it
pub fn test_lookup(handle: &str) -> AccountLookup {
    let (user, host) = handle.split_once('@').unwrap_or((handle, "example.social"));
    AccountLookup {
        subject: format!("acct:{handle}"),
        aliases: vec![format!("https://{host}/@{user}")],
        profile_url: Some(format!("https://{host}/@{user}")),
        subscribe_template: Some(format!("https://{host}/authorize_interaction?uri={{uri}}")),
    }
}

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockDirectory>, Arc<RecordingSurface>) {
    let directory = Arc::new(MockDirectory::new());
    let surface = Arc::new(RecordingSurface::new());
    let ctx = Arc::new(ServiceContext::new(directory.clone(), surface.clone()));
    (ctx, directory, surface)
}

/// 创建测试用 `HandleFieldAdapter`
pub fn create_test_adapter() -> (
    Arc<HandleFieldAdapter>,
    Arc<MockDirectory>,
    Arc<RecordingSurface>,
) {
    let (ctx, directory, surface) = create_test_context();
    (Arc::new(HandleFieldAdapter::new(ctx)), directory, surface)
}

/// A network failure for `host`
pub fn network_error(host: &str) -> LookupError {
    LookupError::NetworkError {
        host: host.to_string(),
        detail: "connection reset".to_string(),
    }
}
