//! Authenticated REST client for the monitoring backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` (see `transport`).
//! Server-side (SSR): every call fails with [`ApiError::Unavailable`] since
//! these endpoints are only meaningful in the browser. Either default can be
//! replaced with [`ApiClient::with_transport`].
//!
//! DESIGN
//! ======
//! Every call flows through the same three steps:
//!
//! 1. [`ApiClient::attach_credential`] adds `Authorization` when the session
//!    holds a credential.
//! 2. The transport sends the request under a fixed deadline.
//! 3. [`ApiClient::finish`] passes successes through and routes failures to
//!    [`ApiClient::on_error`], which turns a 401 into a full session reset.
//!
//! ERROR HANDLING
//! ==============
//! Only 401 is handled here. Everything else (other statuses, network
//! failures, timeouts) reaches the calling view unchanged, with no retry.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    AppAction, AppResponse, BlacklistAction, BlacklistResponse, Ipv6Stats, LiveStatus, LogPage, MessageResponse,
    NewProtectedApp, ProtectedApp, ProtectedAppList, ProtectionRules, RateLimitWindow, RateLimiting, TokenResponse,
    User,
};
use crate::routes::LOGIN_PATH;
use crate::state::auth::{Credential, SessionStore};

pub const DEFAULT_BASE_PATH: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOG_LIMIT: u32 = 100;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Where the backend lives and how long a call may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_path: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_path: DEFAULT_BASE_PATH.to_owned(), timeout: DEFAULT_TIMEOUT }
    }
}

/// Full session reset: a hard navigation to the given path that discards
/// all in-memory application state.
pub type SessionReset = Arc<dyn Fn(&str) + Send + Sync>;

/// Pending transport result: the raw success body, or the failure already
/// mapped to an [`ApiError`] (non-2xx statuses included).
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<String, ApiError>>>>;

/// Sends one prepared request under the given deadline.
pub type Transport = Arc<dyn Fn(PreparedRequest, Duration) -> TransportFuture + Send + Sync>;

/// Browser `fetch` in hydrate builds; [`ApiError::Unavailable`] elsewhere.
#[must_use]
pub fn default_transport() -> Transport {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(|request: PreparedRequest, timeout: Duration| -> TransportFuture {
            Box::pin(super::transport::send(request, timeout))
        })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Arc::new(|_: PreparedRequest, _: Duration| -> TransportFuture { Box::pin(async { Err(ApiError::Unavailable) }) })
    }
}

// =============================================================================
// REQUEST SHAPING
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A transport-neutral outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    #[must_use]
    pub fn get(url: String) -> Self {
        Self { method: Method::Get, url, headers: Vec::new(), body: None }
    }

    #[must_use]
    pub fn post(url: String) -> Self {
        Self { method: Method::Post, url, headers: Vec::new(), body: None }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be serialized.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let raw = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.headers.push(("Content-Type", JSON_CONTENT_TYPE.to_owned()));
        self.body = Some(raw);
        Ok(self)
    }

    /// Attach an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn with_form(mut self, fields: &[(&str, &str)]) -> Self {
        self.headers.push(("Content-Type", FORM_CONTENT_TYPE.to_owned()));
        self.body = Some(form_body(fields));
        self
    }

    /// First header value named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// `"<Kind> <token>"` with the kind's first character uppercased and the rest
/// lowercased, the scheme casing the backend expects.
#[must_use]
pub fn authorization_header(credential: &Credential) -> String {
    format!("{} {}", capitalize_scheme(&credential.kind), credential.token)
}

fn capitalize_scheme(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Join `base` and `endpoint`, appending `query` form-encoded.
#[must_use]
pub fn endpoint_url(base: &str, endpoint: &str, query: &[(&str, &str)]) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), endpoint.trim_start_matches('/'));
    if !query.is_empty() {
        url.push('?');
        url.push_str(&form_body(query));
    }
    url
}

#[must_use]
pub fn form_body(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

// =============================================================================
// CLIENT
// =============================================================================

/// Request pipeline bound to one session.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    session: SessionStore,
    reset: SessionReset,
    transport: Transport,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: SessionStore, reset: SessionReset) -> Self {
        Self { config, session, reset, transport: default_transport() }
    }

    /// Replace the transport every call is sent through.
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Client wired to a hard browser redirect for session resets.
    pub fn for_browser(session: SessionStore) -> Self {
        let reset: SessionReset = Arc::new(crate::util::auth::hard_redirect);
        Self::new(ApiConfig::default(), session, reset)
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> String {
        endpoint_url(&self.config.base_path, endpoint, query)
    }

    /// Set `Authorization` from the stored credential, if any.
    #[must_use]
    pub fn attach_credential(&self, mut request: PreparedRequest) -> PreparedRequest {
        if let Some(credential) = self.session.credential() {
            request.headers.retain(|(n, _)| !n.eq_ignore_ascii_case("Authorization"));
            request.headers.push(("Authorization", authorization_header(&credential)));
        }
        request
    }

    /// Failure hook. A 401 clears the session and performs a full reset to
    /// the login route; every error is handed back unchanged.
    pub fn on_error(&self, error: ApiError) -> ApiError {
        if error.is_unauthorized() {
            leptos::logging::warn!("backend rejected credential, resetting session");
            self.session.clear();
            (self.reset)(LOGIN_PATH);
        }
        error
    }

    /// Success passes through; failure goes through [`Self::on_error`].
    ///
    /// # Errors
    ///
    /// Returns the original error from `result`.
    pub fn finish<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.map_err(|e| self.on_error(e))
    }

    async fn execute<T: DeserializeOwned>(&self, request: PreparedRequest) -> Result<T, ApiError> {
        let request = self.attach_credential(request);
        let result = self.dispatch(request).await;
        self.finish(result)
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: PreparedRequest) -> Result<T, ApiError> {
        let body = (self.transport)(request, self.config.timeout).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        self.execute(PreparedRequest::get(self.url(endpoint, query))).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        let request = PreparedRequest::post(self.url(endpoint, &[])).with_json(body)?;
        self.execute(request).await
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/login` with form-encoded credentials.
    ///
    /// Bypasses the 401 reset: a rejected password is reported to the login
    /// form instead of reloading it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or any
    /// transport error.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = PreparedRequest::post(self.url("/auth/login", &[]))
            .with_form(&[("username", username), ("password", password)]);
        self.dispatch(request).await
    }

    /// `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me", &[]).await
    }

    /// `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.execute(PreparedRequest::post(self.url("/auth/logout", &[]))).await
    }

    /// Log in, persist the credential, then cache the operator profile.
    ///
    /// A profile fetch failing for any reason other than 401 leaves the user
    /// signed in without a cached profile.
    ///
    /// # Errors
    ///
    /// Returns the login error, or a 401 from the profile fetch.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Option<User>, ApiError> {
        let issued = self.login(username, password).await?;
        self.session.store_credential(&issued);
        match self.current_user().await {
            Ok(user) => {
                self.session.save_profile(&user);
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                leptos::logging::warn!("signed in without profile: {e}");
                Ok(None)
            }
        }
    }

    /// Best-effort backend logout; the local session is cleared regardless.
    pub async fn sign_out(&self) {
        if let Err(e) = self.logout().await {
            leptos::logging::warn!("logout request failed: {e}");
        }
        self.session.clear();
    }

    // =========================================================================
    // MONITORING
    // =========================================================================

    /// `GET /access-logs?limit=N`, newest entries last.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn access_logs(&self, limit: Option<u32>) -> Result<LogPage, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).to_string();
        self.get("/access-logs", &[("limit", limit.as_str())]).await
    }

    /// `GET /attack-logs?limit=N`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn attack_logs(&self, limit: Option<u32>) -> Result<LogPage, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).to_string();
        self.get("/attack-logs", &[("limit", limit.as_str())]).await
    }

    /// `GET /ipv6-stats`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn ipv6_stats(&self) -> Result<Ipv6Stats, ApiError> {
        self.get("/ipv6-stats", &[]).await
    }

    /// `GET /status`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn status(&self) -> Result<LiveStatus, ApiError> {
        self.get("/status", &[]).await
    }

    // =========================================================================
    // FIREWALL CONFIGURATION
    // =========================================================================

    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn protection_rules(&self) -> Result<ProtectionRules, ApiError> {
        self.get("/protection-rules", &[]).await
    }

    /// Merge `rules` into the backend's rule set.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_protection_rules(
        &self,
        rules: &BTreeMap<String, Vec<String>>,
    ) -> Result<ProtectionRules, ApiError> {
        self.post_json("/protection-rules", &serde_json::json!({ "rules": rules })).await
    }

    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn rate_limiting(&self) -> Result<RateLimiting, ApiError> {
        self.get("/rate-limiting", &[]).await
    }

    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_rate_limiting(&self, limits: RateLimitWindow) -> Result<RateLimiting, ApiError> {
        self.post_json("/rate-limiting", &limits).await
    }

    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_blacklist(&self, action: &BlacklistAction) -> Result<BlacklistResponse, ApiError> {
        self.post_json("/blacklist", action).await
    }

    // =========================================================================
    // PROTECTED APPLICATIONS
    // =========================================================================

    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn protected_apps(&self) -> Result<ProtectedAppList, ApiError> {
        self.get("/protected-apps", &[]).await
    }

    /// # Errors
    ///
    /// Returns any pipeline error; unknown ids come back as a 404 status.
    pub async fn protected_app(&self, id: u64) -> Result<ProtectedApp, ApiError> {
        self.get(&format!("/protected-apps/{id}"), &[]).await
    }

    /// # Errors
    ///
    /// Returns any pipeline error; missing fields come back as a 400 status.
    pub async fn add_protected_app(&self, app: &NewProtectedApp) -> Result<AppResponse, ApiError> {
        self.post_json("/protected-apps", app).await
    }

    /// Delete an app or toggle its protection / running state.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn protected_app_action(&self, id: u64, action: AppAction) -> Result<AppResponse, ApiError> {
        self.post_json(&format!("/protected-apps/{id}"), &action).await
    }
}
