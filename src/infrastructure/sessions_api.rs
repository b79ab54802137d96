#[cfg(test)]
#[path = "sessions_api_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::SessionsApi;

/// REST companion of the socket.io server, used to drop server-side session
/// state once the widget is done with it.
pub struct HttpSessionsApi {
    url: String,
    timeout: Duration,
}

impl Default for HttpSessionsApi {
    fn default() -> HttpSessionsApi {
        return HttpSessionsApi::new(
            &Config::get(ConfigKey::Endpoint),
            Duration::from_millis(Config::get_u64(ConfigKey::DeleteSessionTimeout)),
        );
    }
}

impl HttpSessionsApi {
    pub fn new(url: &str, timeout: Duration) -> HttpSessionsApi {
        return HttpSessionsApi {
            url: url.trim_end_matches('/').to_string(),
            timeout,
        };
    }
}

#[async_trait]
impl SessionsApi for HttpSessionsApi {
    #[allow(clippy::implicit_return)]
    async fn delete_session(&self, session_id: &str) -> Result<()> {
        if session_id.is_empty() {
            bail!("No session to delete");
        }

        let res = reqwest::Client::new()
            .delete(format!(
                "{url}/api/sessions/{session_id}",
                url = self.url
            ))
            .timeout(self.timeout)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, session_id, "session delete request failed");
                bail!("Failed to reach the sessions API");
            }
        };

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                session_id,
                "session delete rejected"
            );
            bail!(format!(
                "Session delete failed with status {}",
                res.status().as_u16()
            ));
        }

        return Ok(());
    }
}
