//! Blocking HTTP client for the fetch phase
//!
//! One ureq agent with a short global timeout; bodies are decoded lossily so
//! a stray invalid byte in a fixture never turns into a decode error.

use std::time::Duration;

use ureq::Agent;

use crate::error::SmokeError;

/// Per-request timeout. The server is on loopback, so anything slower than
/// this means something is genuinely wrong.
const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

pub struct Client {
    agent: Agent,
}

impl Client {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// GET `url` and return the body as text, replacing invalid byte
    /// sequences. Non-200 statuses are failures.
    pub fn fetch_text(&self, url: &str) -> Result<String, SmokeError> {
        tracing::debug!(%url, "GET");
        match self.agent.get(url).call() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if status != 200 {
                    return Err(SmokeError::UnexpectedStatus {
                        url: url.to_string(),
                        status,
                    });
                }
                let mut body = resp.into_body();
                let bytes = body.read_to_vec().map_err(|e| SmokeError::Network {
                    url: url.to_string(),
                    source: Box::new(e),
                })?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            // ureq surfaces 4xx/5xx as errors; fold them into the status
            // failure rather than the transport one.
            Err(ureq::Error::StatusCode(status)) => Err(SmokeError::UnexpectedStatus {
                url: url.to_string(),
                status,
            }),
            Err(e) => Err(SmokeError::Network {
                url: url.to_string(),
                source: Box::new(e),
            }),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
