// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated API client.
//!
//! Handles:
//! - Bearer token attachment from the token store
//! - Envelope unwrapping (callers only ever see `data`)
//! - One silent token refresh and retry per request on 401
//! - Success/error notifications and the forced logout path

pub mod envelope;
pub mod upload;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::notify::{Navigator, Notifier, TracingNavigator, TracingNotifier};
use crate::storage::{MemoryTokenStore, TokenPair, TokenStore};
use envelope::{field_errors, first_field_message, Page, RawEnvelope};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
pub use upload::{Upload, UploadFile};

/// Token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Request body variants. Kept in replayable form so a request can be
/// re-issued after a refresh.
#[derive(Debug, Clone)]
enum Body {
    Empty,
    Json(Value),
    Multipart(Upload),
}

/// Everything needed to (re)build one request.
#[derive(Debug, Clone)]
struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
    /// Anonymous requests carry no bearer token and never trigger a refresh.
    anonymous: bool,
}

impl RequestSpec {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: Body::Empty,
            anonymous: false,
        }
    }

    fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidInput(format!("Unserializable body: {e}")))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self, ApiError> {
        self.query = query_pairs(query)?;
        Ok(self)
    }
}

/// Flatten a serializable struct or map into query pairs, skipping `None`s.
fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(query)
        .map_err(|e| ApiError::InvalidInput(format!("Unserializable query: {e}")))?;

    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::InvalidInput(format!(
                "Query must be an object, got {other}"
            )))
        }
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    /// Serializes refresh attempts so concurrent 401s share one refresh.
    refresh_lock: Mutex<()>,
}

/// Backend API client. Cheap to clone; clones share tokens and the refresh lock.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Create a client from configuration with the given token store.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::builder().config(config).token_store(tokens).build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.inner.tokens.as_ref()
    }

    // ─── Public verbs ────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::new(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::GET, path).query(query)?;
        self.request(spec).await
    }

    /// GET a list endpoint and keep its pagination metadata.
    pub async fn get_page<T, Q>(&self, path: &str, query: &Q) -> Result<Page<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::GET, path).query(query)?;
        let envelope = self.execute(spec).await?;
        Page::from_envelope(envelope).map_err(|e| self.report(e))
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::POST, path).json(body)?;
        self.request(spec).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::PUT, path).json(body)?;
        self.request(spec).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::PATCH, path).json(body)?;
        self.request(spec).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::new(Method::DELETE, path)).await
    }

    /// POST without a bearer token and without the refresh path (login, OTP,
    /// registration). A 401 here is a plain `Unauthorized`.
    pub async fn post_anonymous<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut spec = RequestSpec::new(Method::POST, path).json(body)?;
        spec.anonymous = true;
        self.request(spec).await
    }

    /// Best-effort authenticated POST: a 401 does not trigger a refresh and
    /// nothing is notified. Only the status is checked.
    pub async fn post_quiet<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let spec = RequestSpec::new(Method::POST, path).json(body)?;
        let token = self.inner.tokens.access_token()?;
        let status = self.send(&spec, token.as_deref()).await?.status();
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or(ApiError::GENERIC_MESSAGE)
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Multipart POST of one or more files.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: Upload,
    ) -> Result<T, ApiError> {
        upload.validate()?;
        let mut spec = RequestSpec::new(Method::POST, path);
        spec.body = Body::Multipart(upload);
        self.request(spec).await
    }

    // ─── Request pipeline ────────────────────────────────────────────────────

    /// Run a request and decode its `data`. Mutations announce the envelope
    /// message only once the payload decoded.
    async fn request<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, ApiError> {
        let announce = spec.method != Method::GET;
        let envelope = self.execute(spec).await?;
        let message = envelope
            .message()
            .filter(|_| announce)
            .map(str::to_string);

        let data = envelope.into_data().map_err(|e| self.report(e))?;
        if let Some(message) = message {
            self.inner.notifier.success(&message);
        }
        Ok(data)
    }

    /// Send a request, recovering once from an expired access token.
    async fn execute(&self, spec: RequestSpec) -> Result<RawEnvelope, ApiError> {
        let sent_token = if spec.anonymous {
            None
        } else {
            self.inner.tokens.access_token().map_err(|e| self.report(e))?
        };

        let response = self
            .send(&spec, sent_token.as_deref())
            .await
            .map_err(|e| self.report(e))?;

        if response.status() != StatusCode::UNAUTHORIZED || spec.anonymous {
            return self.finish(response).await;
        }

        tracing::debug!(
            method = %spec.method,
            path = %spec.path,
            "Received 401, attempting session recovery"
        );

        let token = self
            .recover_session(sent_token.as_deref())
            .await
            .map_err(|e| self.report(e))?;

        // Single retry; a second 401 falls through to the normal error path.
        let retried = self
            .send(&spec, Some(&token))
            .await
            .map_err(|e| self.report(e))?;
        self.finish(retried).await
    }

    async fn send(
        &self,
        spec: &RequestSpec,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, spec.path);
        let mut request = self.inner.http.request(spec.method.clone(), &url);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        request = match &spec.body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Multipart(upload) => request.multipart(upload.to_form()?),
        };

        request.send().await.map_err(ApiError::from_transport)
    }

    /// Turn a response into an envelope or an error.
    async fn finish(&self, response: reqwest::Response) -> Result<RawEnvelope, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.report(ApiError::from_transport(e)))?;

        if status.is_success() {
            let envelope = RawEnvelope::parse(&body).map_err(|e| self.report(e))?;

            if envelope.success == Some(false) {
                let message = envelope
                    .message()
                    .unwrap_or(ApiError::GENERIC_MESSAGE)
                    .to_string();
                return Err(self.report(ApiError::Api {
                    status: status.as_u16(),
                    message,
                }));
            }
            return Ok(envelope);
        }

        // Error bodies are not always JSON (proxies, HTML error pages)
        let envelope = RawEnvelope::parse(&body).unwrap_or_default();
        let message = envelope.message().map(str::to_string);

        let err = match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message.unwrap_or_default()),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let fields = field_errors(envelope.errors.as_ref());
                let message = first_field_message(&fields)
                    .map(str::to_string)
                    .or(message)
                    .unwrap_or_else(|| "Validation failed".to_string());
                ApiError::Validation { message, fields }
            }
            _ => ApiError::Api {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or(ApiError::GENERIC_MESSAGE)
                        .to_string()
                }),
            },
        };

        Err(self.report(err))
    }

    /// Log and notify an error, then hand it back for propagation.
    pub(crate) fn report(&self, err: ApiError) -> ApiError {
        if matches!(err, ApiError::SessionExpired) {
            // Already announced by `expire_session`
            return err;
        }
        tracing::warn!(
            category = ?err.category(),
            status = err.status(),
            error = %err,
            "API request failed"
        );
        self.inner.notifier.error(&err.user_message());
        err
    }

    // ─── Session recovery ────────────────────────────────────────────────────

    /// Obtain a usable access token after a 401 for a request sent with
    /// `sent_token`.
    ///
    /// Refreshes run one at a time. A task that waited on the lock first checks
    /// whether the task ahead of it already refreshed (stored token changed) or
    /// already logged out (store emptied) and reuses that outcome.
    async fn recover_session(&self, sent_token: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;

        let current = self.inner.tokens.access_token()?;
        match (current, sent_token) {
            (Some(current), sent) if Some(current.as_str()) != sent => {
                tracing::debug!("Token already refreshed by a concurrent request");
                return Ok(current);
            }
            (None, Some(_)) => {
                tracing::debug!("Session already expired by a concurrent request");
                return Err(ApiError::SessionExpired);
            }
            _ => {}
        }

        let Some(refresh_token) = self.inner.tokens.refresh_token()? else {
            return Err(self.expire_session("no refresh token stored"));
        };

        match self.refresh_tokens(&refresh_token).await {
            Ok(tokens) => {
                // Both tokens are persisted before the original request is retried
                self.inner.tokens.set_tokens(&tokens)?;
                tracing::info!("Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                Err(self.expire_session("refresh rejected"))
            }
        }
    }

    /// Call the refresh endpoint directly, bypassing the retry pipeline.
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let url = format!("{}{}", self.inner.base_url, REFRESH_PATH);
        let response = self
            .inner
            .http
            .post(&url)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;
        let envelope = RawEnvelope::parse(&body).unwrap_or_default();

        if !status.is_success() || envelope.success == Some(false) {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: envelope
                    .message()
                    .unwrap_or("Token refresh failed")
                    .to_string(),
            });
        }

        envelope.into_data()
    }

    /// Drop the session: clear tokens, tell the user, send them to login.
    fn expire_session(&self, reason: &str) -> ApiError {
        tracing::warn!(reason, "Session expired, logging out");
        if let Err(e) = self.inner.tokens.clear() {
            tracing::error!(error = %e, "Failed to clear stored tokens");
        }
        self.inner.notifier.session_expired();
        self.inner
            .navigator
            .redirect_to_login(&self.inner.login_path);
        ApiError::SessionExpired
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    login_path: Option<String>,
    user_agent: Option<String>,
    tokens: Option<Arc<dyn TokenStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ApiClientBuilder {
    /// Take base URL, timeout and login path from a config.
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.base_url = Some(config.api_url.clone());
        self.timeout = Some(config.timeout);
        self.login_path = Some(config.login_path.clone());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Config("base_url is required".into()))?;
        let base_url = crate::config::normalize_base_url(&base_url)
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS)),
            )
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| format!("stemlab-client/{}", env!("CARGO_PKG_VERSION"))),
            )
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                login_path: self.login_path.unwrap_or_else(|| "/login".to_string()),
                tokens: self
                    .tokens
                    .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()) as Arc<dyn TokenStore>),
                notifier: self
                    .notifier
                    .unwrap_or_else(|| Arc::new(TracingNotifier) as Arc<dyn Notifier>),
                navigator: self
                    .navigator
                    .unwrap_or_else(|| Arc::new(TracingNavigator) as Arc<dyn Navigator>),
                refresh_lock: Mutex::new(()),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Filter {
        status: Option<&'static str>,
        page: Option<u32>,
        search: Option<String>,
    }

    #[test]
    fn test_query_pairs_skip_none() {
        let pairs = query_pairs(&Filter {
            status: Some("PUBLISHED"),
            page: Some(2),
            search: None,
        })
        .unwrap();
        assert!(pairs.contains(&("status".to_string(), "PUBLISHED".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_query_pairs_rejects_scalars() {
        assert!(query_pairs(&5).is_err());
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ApiClient::builder().build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = ApiClient::builder()
            .base_url("http://localhost:5000/api/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }
}
