//! Connectivity probe
//!
//! A diagnostic for the UI: can the backend be reached at all from here?
//! It never fails and never touches the session token.

use crate::client::RecipeClient;
use crate::payload::Payload;
use serde::Serialize;
use tracing::debug;

/// Paths tried in order
const PROBE_PATHS: &[&str] = &["/health", "/"];

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: RecipeClient,
}

impl HealthApi {
    /// Create a new health API interface
    pub(crate) fn new(client: RecipeClient) -> Self {
        Self { client }
    }

    /// Probe `GET /health`, falling back to `GET /`.
    ///
    /// The first candidate that yields any response wins, whatever its status.
    /// Candidates are tried one after the other. When none answers, the
    /// result is `ok: false`, `status: 0` with the first URL tried.
    pub async fn check(&self) -> ProbeResult {
        let base = self.client.base_url();
        let urls: Vec<String> = PROBE_PATHS.iter().map(|p| format!("{base}{p}")).collect();

        for url in &urls {
            match self.client.raw_get(url).await {
                Ok((status, body)) => {
                    debug!(url = %url, status, "Probe answered");
                    return ProbeResult {
                        ok: (200..300).contains(&status),
                        status,
                        url: url.clone(),
                        body,
                    };
                }
                Err(e) => {
                    debug!(url = %url, error = %e, "Probe attempt failed");
                }
            }
        }

        ProbeResult::unreachable(urls.into_iter().next().unwrap_or(base))
    }
}

/// Outcome of a connectivity probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    /// Whether the answer had a success status
    pub ok: bool,
    /// HTTP status, or 0 when nothing answered
    pub status: u16,
    /// URL that answered, or the first URL tried
    pub url: String,
    /// Decoded body
    pub body: Payload,
}

impl ProbeResult {
    /// Result reported when no candidate answered
    #[must_use]
    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: 0,
            url: url.into(),
            body: Payload::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;

    #[test]
    fn test_unreachable_result() {
        let result = ProbeResult::unreachable("http://localhost:3001/health");
        assert!(!result.ok);
        assert_eq!(result.status, 0);
        assert!(result.body.is_null());
    }

    #[test]
    fn test_check_against_closed_port() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = RecipeClient::with_config(ClientConfig::for_base_url(base.clone())).unwrap();
        let result = tokio_test::block_on(client.health().check());
        assert_eq!(result, ProbeResult::unreachable(format!("{base}/health")));
    }

    #[test]
    fn test_probe_result_serializes() {
        let result = ProbeResult {
            ok: true,
            status: 200,
            url: "http://x/health".to_string(),
            body: Payload::Json(json!({"status": "ok"})),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"ok": true, "status": 200, "url": "http://x/health", "body": {"status": "ok"}})
        );
    }
}
