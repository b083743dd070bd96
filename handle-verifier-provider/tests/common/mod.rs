//! 共享测试工具和辅助函数

#![allow(dead_code)]

use handle_verifier_provider::{DirectoryConfig, FediverseDirectory, Handle};
use serde_json::{Value, json};
use wiremock::MockServer;

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_env {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// Directory pointed at plain-HTTP servers, with `max_retries` retries.
pub fn local_directory(max_retries: u32) -> FediverseDirectory {
    FediverseDirectory::new(DirectoryConfig {
        scheme: "http".to_string(),
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
        max_retries,
        ..DirectoryConfig::default()
    })
    .expect("创建 HTTP client 失败")
}

/// `host:port` of a running mock server.
pub fn mock_host(server: &MockServer) -> String {
    server.address().to_string()
}

/// `127.0.0.1:<port>` with nothing listening on it.
///
/// The OS hands out a free port, the listener is dropped right away and the
/// port stays closed for the rest of the test.
pub fn closed_local_host() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind 失败");
    let addr = listener.local_addr().expect("local_addr 失败");
    drop(listener);
    addr.to_string()
}

/// Handle on the mock server.
pub fn handle_on(server: &MockServer, user: &str) -> Handle {
    Handle::parse(&format!("{user}@{}", mock_host(server))).expect("mock handle should parse")
}

/// Mastodon-style JRD document for `user@host`.
pub fn jrd_for(user: &str, host: &str) -> Value {
    json!({
        "subject": format!("acct:{user}@{host}"),
        "aliases": [format!("http://{host}/@{user}")],
        "links": [
            {
                "rel": "http://webfinger.net/rel/profile-page",
                "type": "text/html",
                "href": format!("http://{host}/@{user}")
            },
            {
                "rel": "http://ostatus.org/schema/1.0/subscribe",
                "template": format!("http://{host}/authorize_interaction?uri={{uri}}")
            }
        ]
    })
}
