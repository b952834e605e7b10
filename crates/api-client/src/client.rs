//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AuthApi, HealthApi, RecipesApi, SavedApi};
use crate::error::{ApiError, ApiResult};
use crate::payload::Payload;
use crate::request::Request;
use crate::routes::Visibility;
use crate::session::{TokenProvider, TokenSlot};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Recipe API client
///
/// Wraps `reqwest` and adds:
/// - Base URL resolution on every call
/// - Bearer auth on protected routes only
/// - JSON/text decoding that never fails on malformed bodies
/// - Classified transport and status errors
///
/// Clones share the HTTP connection pool and the token slot. No cookies are
/// stored or forwarded, no timeout is imposed, and failed calls are never
/// retried.
#[derive(Clone)]
pub struct RecipeClient {
    inner: Client,
    config: Arc<ClientConfig>,
    tokens: TokenSlot,
}

impl RecipeClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        Self::with_token_slot(config, TokenSlot::new())
    }

    /// Create a new client reading tokens from an existing slot
    pub fn with_token_slot(config: ClientConfig, tokens: TokenSlot) -> ApiResult<Self> {
        config.validate()?;

        let inner = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            tokens,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve the base URL as the next request will see it
    #[must_use]
    pub fn base_url(&self) -> String {
        self.config.resolver.resolve()
    }

    /// Register the token provider; last registration wins
    pub fn set_token_provider<P: TokenProvider + 'static>(&self, provider: P) {
        self.tokens.set_token_provider(provider);
    }

    /// Drop the registered token provider
    pub fn clear_token_provider(&self) {
        self.tokens.clear();
    }

    /// The slot this client reads tokens from
    #[must_use]
    pub fn token_slot(&self) -> &TokenSlot {
        &self.tokens
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access recipe search and lookup
    #[must_use]
    pub fn recipes(&self) -> RecipesApi {
        RecipesApi::new(self.clone())
    }

    /// Access the current user's saved collection
    #[must_use]
    pub fn saved(&self) -> SavedApi {
        SavedApi::new(self.clone())
    }

    /// Access login and signup
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the connectivity probe
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    /// Perform a GET request
    pub async fn get(&self, path: &str) -> ApiResult<Payload> {
        self.send(Request::get(path)).await
    }

    /// Issue a request and decode the response.
    ///
    /// Success statuses return the decoded payload unchanged. Failing
    /// statuses become [`ApiError::Status`]; no response at all becomes
    /// [`ApiError::Transport`].
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: Request) -> ApiResult<Payload> {
        let base = self.base_url();
        let path = request.normalized_path();
        let url = format!("{base}{path}");
        let visibility = self.config.routes.classify(&path);
        let request_id = Uuid::new_v4().to_string();

        let headers = self.build_headers(&request, visibility, &request_id)?;
        let authorized = headers.contains_key(AUTHORIZATION);

        debug!(
            request_id = %request_id,
            url = %url,
            visibility = ?visibility,
            authorized,
            "Sending request"
        );

        let mut builder = self.inner.request(request.method.clone(), &url).headers(headers);
        if let Some(ref body) = request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let text = error_chain(&e);
                let err = ApiError::transport(&text, &base, url.as_str());
                warn!(
                    request_id = %request_id,
                    url = %url,
                    base = %base,
                    classification = ?err.transport_kind(),
                    message = %text,
                    "Request failed before a response was received"
                );
                return Err(err);
            }
        };

        self.handle_response(&request_id, response).await
    }

    /// Assemble headers: JSON content type, caller headers, then bearer auth
    /// when the route is protected and a token is available.
    pub(crate) fn build_headers(
        &self,
        request: &Request,
        visibility: Visibility,
        request_id: &str,
    ) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(X_REQUEST_ID, value);
        }

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        if visibility == Visibility::Protected {
            if let Some(token) = self.tokens.current_token() {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| ApiError::InvalidHeader("authorization token".to_string()))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    /// Decode the body, then map failing statuses to errors
    async fn handle_response(&self, request_id: &str, response: Response) -> ApiResult<Payload> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let payload = match response.text().await {
            Ok(body) => Payload::decode(&content_type, &body),
            Err(e) => {
                debug!(request_id = %request_id, error = %e, "Failed to read response body");
                Payload::Null
            }
        };

        if status.is_success() {
            debug!(request_id = %request_id, status = status.as_u16(), "Request succeeded");
            Ok(payload)
        } else {
            let message = payload.error_message(status.as_u16());
            debug!(
                request_id = %request_id,
                status = status.as_u16(),
                message = %message,
                "Request failed"
            );
            Err(ApiError::status(status.as_u16(), message, payload))
        }
    }

    /// Plain GET used by diagnostics: no auth, no content type, raw outcome.
    pub(crate) async fn raw_get(&self, url: &str) -> Result<(u16, Payload), reqwest::Error> {
        let response = self.inner.request(Method::GET, url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let payload = response
            .text()
            .await
            .map_or(Payload::Null, |body| Payload::decode(&content_type, &body));
        Ok((status, payload))
    }
}

/// Render an error with its sources, outermost first
fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
