//! Server compatibility probe

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::types::InstanceInfo;

use super::FediverseDirectory;

const INSTANCE_PATH: &str = "/api/v1/instance";

impl FediverseDirectory {
    /// A server is compatible when `/api/v1/instance` answers with a version.
    ///
    /// Any HTTP answer without one is a definite "no"; only transport failures
    /// (and a host that cannot form a URL) are returned as errors.
    pub(crate) async fn probe_instance(&self, host: &str) -> Result<bool> {
        let url = self.url(host, INSTANCE_PATH)?;
        let endpoint = url.to_string();
        let request = self.client.get(url).header("Accept", "application/json");

        let reply = HttpUtils::execute_request_with_retry(
            request,
            host,
            &endpoint,
            self.config.max_retries,
        )
        .await?;

        if !reply.is_success() {
            log::debug!(
                "[{host}] Instance endpoint answered HTTP {}, not compatible",
                reply.status
            );
            return Ok(false);
        }

        match serde_json::from_str::<InstanceInfo>(&reply.body) {
            Ok(info) => {
                let compatible = info.is_compatible();
                log::debug!(
                    "[{host}] Instance version {:?}, compatible={compatible}",
                    info.version
                );
                Ok(compatible)
            }
            Err(e) => {
                log::debug!("[{host}] Instance endpoint returned non-JSON body: {e}");
                Ok(false)
            }
        }
    }
}
