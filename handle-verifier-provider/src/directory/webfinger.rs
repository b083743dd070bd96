//! WebFinger account lookup (RFC 7033)

use crate::error::{LookupError, Result};
use crate::handle::Handle;
use crate::http_client::HttpUtils;
use crate::types::{AccountLookup, WebFingerResponse};
use crate::utils::log_sanitizer::truncate_for_log;

use super::FediverseDirectory;

const WEBFINGER_PATH: &str = "/.well-known/webfinger";
const JRD_ACCEPT: &str = "application/jrd+json, application/json";

impl FediverseDirectory {
    /// `GET /.well-known/webfinger?resource=acct:user@host`
    pub(crate) async fn webfinger(&self, handle: &Handle) -> Result<AccountLookup> {
        let host = handle.server_host();
        let resource = handle.acct_uri();
        let mut url = self.url(host, WEBFINGER_PATH)?;
        url.set_query(Some(&format!("resource={}", urlencoding::encode(&resource))));

        let endpoint = url.to_string();
        let request = self.client.get(url).header("Accept", JRD_ACCEPT);
        let reply = HttpUtils::execute_request_with_retry(
            request,
            host,
            &endpoint,
            self.config.max_retries,
        )
        .await?;

        if reply.is_success() {
            let jrd: WebFingerResponse = reply.json(host)?;
            log::debug!("[{host}] WebFinger subject: {}", jrd.subject);
            return Ok(AccountLookup::from(jrd));
        }

        match reply.status {
            404 | 410 => Err(LookupError::AccountNotFound {
                host: host.to_string(),
                handle: handle.to_string(),
                raw_message: (!reply.body.is_empty()).then(|| truncate_for_log(&reply.body)),
            }),
            status => Err(LookupError::Unknown {
                host: host.to_string(),
                status: Some(status),
                raw_message: truncate_for_log(&reply.body),
            }),
        }
    }
}
