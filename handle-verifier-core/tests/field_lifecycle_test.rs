//! Handle field end to end: settings framework, adapter and a real
//! `FediverseDirectory` talking to a wiremock server.

use std::sync::{Arc, Mutex, PoisonError};

use handle_verifier_core::services::DEFAULT_FIELD_ID;
use handle_verifier_core::traits::HideOptions;
use handle_verifier_core::types::{QuickCheck, ValidationState};
use handle_verifier_core::{
    CoreError, HandleFieldAdapter, InMemorySettings, MessageSurface, ServiceContext,
};
use handle_verifier_provider::{
    AccountDirectory, DirectoryConfig, FediverseDirectory, Handle, LookupError,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Remembers the banner that is currently up.
#[derive(Default)]
struct BannerSurface {
    shown: Mutex<Option<String>>,
}

impl BannerSurface {
    fn shown(&self) -> Option<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, key: Option<&str>) {
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = key.map(str::to_string);
    }
}

impl MessageSurface for BannerSurface {
    fn show_warning(&self, key: &str) {
        self.set(Some(key));
    }

    fn show_error(&self, key: &str) {
        self.set(Some(key));
    }

    fn hide_warning(&self, _options: HideOptions) {
        self.set(None);
    }

    fn hide_error(&self, _options: HideOptions) {
        self.set(None);
    }
}

struct Harness {
    server: MockServer,
    host: String,
    settings: InMemorySettings,
    adapter: Arc<HandleFieldAdapter>,
    surface: Arc<BannerSurface>,
    directory: Arc<FediverseDirectory>,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let host = server.address().to_string();

    let directory = Arc::new(
        FediverseDirectory::new(DirectoryConfig {
            scheme: "http".to_string(),
            connect_timeout_secs: 2,
            request_timeout_secs: 5,
            max_retries: 0,
            ..DirectoryConfig::default()
        })
        .expect("directory"),
    );
    let surface = Arc::new(BannerSurface::default());
    let ctx = Arc::new(ServiceContext::new(directory.clone(), surface.clone()));
    let adapter = Arc::new(HandleFieldAdapter::new(ctx));
    let settings = InMemorySettings::new();
    adapter.register(&settings);

    Harness {
        server,
        host,
        settings,
        adapter,
        surface,
        directory,
    }
}

impl Harness {
    fn handle(&self, user: &str) -> String {
        format!("{user}@{}", self.host)
    }

    async fn account(&self, user: &str) {
        let host = &self.host;
        Mock::given(method("GET"))
            .and(path("/.well-known/webfinger"))
            .and(query_param("resource", format!("acct:{user}@{host}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "subject": format!("acct:{user}@{host}"),
                "links": [{
                    "rel": "http://ostatus.org/schema/1.0/subscribe",
                    "template": format!("http://{host}/authorize_interaction?uri={{uri}}")
                }]
            })))
            .mount(&self.server)
            .await;
    }

    async fn no_such_accounts(&self) {
        Mock::given(method("GET"))
            .and(path("/.well-known/webfinger"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }

    async fn instance(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/instance"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    fn state(&self) -> ValidationState {
        self.adapter.display().current()
    }
}

#[tokio::test]
async fn valid_handle_is_saved() {
    let h = harness().await;
    h.account("alice").await;

    h.settings.load(DEFAULT_FIELD_ID, None).await.unwrap();
    assert_eq!(h.surface.shown().as_deref(), Some("accountEmpty"));

    h.settings
        .edit(DEFAULT_FIELD_ID, &h.handle("alice"))
        .unwrap();
    let saved = h.settings.save(DEFAULT_FIELD_ID).await.unwrap();

    let expected = Handle::parse(&h.handle("alice")).unwrap();
    assert_eq!(saved, Some(expected.clone()));
    assert_eq!(h.state(), ValidationState::None);
    assert_eq!(h.surface.shown(), None);
    // lookup during validation already filled the cache
    assert_eq!(
        h.directory.cached_subscribe_template(&expected).await,
        Some(format!("http://{}/authorize_interaction?uri={{uri}}", h.host))
    );
}

#[tokio::test]
async fn missing_account_on_mastodon_server() {
    let h = harness().await;
    h.no_such_accounts().await;
    h.instance(200, json!({ "version": "4.2.0" })).await;

    h.settings.load(DEFAULT_FIELD_ID, None).await.unwrap();
    h.settings
        .edit(DEFAULT_FIELD_ID, &h.handle("ghost"))
        .unwrap();
    let err = h.settings.save(DEFAULT_FIELD_ID).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Lookup(LookupError::AccountNotFound { .. })
    ));
    assert_eq!(h.state(), ValidationState::Nonexistent);
    assert_eq!(h.surface.shown().as_deref(), Some("accountNotExist"));
    assert_eq!(h.settings.stored(DEFAULT_FIELD_ID).unwrap(), None);
}

#[tokio::test]
async fn server_without_instance_api_is_not_compatible() {
    let h = harness().await;
    h.no_such_accounts().await;
    h.instance(404, json!({ "error": "not found" })).await;

    h.settings.load(DEFAULT_FIELD_ID, None).await.unwrap();
    h.settings.edit(DEFAULT_FIELD_ID, &h.handle("a")).unwrap();
    let err = h.settings.save(DEFAULT_FIELD_ID).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Lookup(LookupError::AccountNotFound { .. })
    ));
    assert_eq!(h.state(), ValidationState::NotCompatibleServer);
    assert_eq!(
        h.surface.shown().as_deref(),
        Some("accountNotCompatibleServer")
    );
}

#[tokio::test]
async fn server_error_is_check_failed() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/webfinger"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;
    h.instance(200, json!({ "version": "4.2.0" })).await;

    h.settings.load(DEFAULT_FIELD_ID, None).await.unwrap();
    h.settings.edit(DEFAULT_FIELD_ID, &h.handle("a")).unwrap();
    assert!(h.settings.save(DEFAULT_FIELD_ID).await.is_err());

    assert_eq!(h.state(), ValidationState::CheckFailed);
    assert_eq!(h.surface.shown().as_deref(), Some("accountCheckFailed"));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let h = harness().await;
    // port 9 (discard) on loopback is not listening
    h.settings.load(DEFAULT_FIELD_ID, None).await.unwrap();
    h.settings
        .edit(DEFAULT_FIELD_ID, "alice@127.0.0.1:9")
        .unwrap();
    let err = h.settings.save(DEFAULT_FIELD_ID).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Lookup(LookupError::NetworkError { .. } | LookupError::Timeout { .. })
    ));
    assert_eq!(h.state(), ValidationState::NetworkError);
    assert_eq!(h.surface.shown().as_deref(), Some("accountNetworkError"));
}

#[tokio::test]
async fn typing_fixes_and_re_arms_errors() {
    let h = harness().await;
    h.no_such_accounts().await;
    h.instance(200, json!({ "version": "4.2.0" })).await;
    h.settings.load(DEFAULT_FIELD_ID, None).await.unwrap();

    h.settings.edit(DEFAULT_FIELD_ID, "ghost").unwrap();
    assert!(matches!(
        h.settings.save(DEFAULT_FIELD_ID).await,
        Err(CoreError::InvalidSyntax(_))
    ));
    assert_eq!(h.surface.shown().as_deref(), Some("accountInvalidSyntax"));

    // still unparsable: message stays
    assert!(matches!(
        h.settings.edit(DEFAULT_FIELD_ID, "ghost@").unwrap(),
        QuickCheck::Unchanged
    ));
    assert_eq!(h.state(), ValidationState::InvalidSyntax);

    // parsable: cleared without a remote call
    let ghost = h.handle("ghost");
    assert!(matches!(
        h.settings.edit(DEFAULT_FIELD_ID, &ghost).unwrap(),
        QuickCheck::Cleared
    ));
    assert_eq!(h.surface.shown(), None);

    // back to the last rejected text
    let check = h.settings.edit(DEFAULT_FIELD_ID, "ghost@").unwrap();
    assert!(matches!(check, QuickCheck::Revalidating(_)));
    assert!(matches!(
        check.settle().await,
        Some(Err(CoreError::InvalidSyntax(_)))
    ));
    assert_eq!(h.state(), ValidationState::InvalidSyntax);
    assert_eq!(h.surface.shown().as_deref(), Some("accountInvalidSyntax"));
}
