//! Main client implementation.
//!
//! Every call goes through [`BountyClient::execute`], which attaches the
//! bearer token and recovers from an expired access token by refreshing it
//! once and resubmitting the request.

use std::sync::Arc;
use std::time::Duration;

use bountyboard_auth::{InMemorySession, SessionProvider, SharedSessionProvider};
use bountyboard_types::{Session, defaults};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use tokio::sync::Mutex;
use url::Url;

use crate::api::{AuthApi, BookmarksApi, BountiesApi, ProjectsApi};
use crate::error::{Error, ErrorResponse, Result};
use crate::tokens::{TokenPair, normalize_tokens};
use crate::types::RefreshRequest;

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(defaults::TIMEOUT_SECS);

/// Path of the token refresh endpoint, relative to the API root.
pub const REFRESH_PATH: &str = "auth/refresh";

pub use bountyboard_types::defaults::NO_REFRESH_PATHS as DEFAULT_NO_REFRESH_PATHS;

/// Bountyboard API client.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use bountyboard_auth::TokenStore;
/// use bountyboard_client::BountyClient;
/// use bountyboard_storage::FileStore;
///
/// # async fn example() -> bountyboard_client::Result<()> {
/// let session = TokenStore::new(Arc::new(FileStore::new("/tmp/bountyboard"))).shared();
/// let client = BountyClient::builder()
///     .base_url("http://localhost:4000")
///     .session(session)
///     .build()?;
///
/// let bounty = client.bounties().get("b1").await?;
/// println!("{}", bounty.title);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BountyClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client used for intercepted API calls.
    http: reqwest::Client,
    /// Separate client for the refresh call so it never re-enters the interceptor.
    refresh_http: reqwest::Client,
    /// Base URL of the backend (without `/api`).
    base_url: Url,
    /// Request timeout.
    timeout: Duration,
    /// Session the bearer token is read from and written back to.
    session: SharedSessionProvider,
    /// Path fragments exempt from refresh handling.
    no_refresh_paths: Vec<String>,
    /// Whether concurrent 401s share one refresh.
    coalesce_refresh: bool,
    /// Serializes refreshes when coalescing.
    refresh_lock: Mutex<()>,
}

/// An outbound request, kept in a form that can be sent more than once.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn json<B: serde::Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

impl std::fmt::Debug for BountyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BountyClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("coalesce_refresh", &self.inner.coalesce_refresh)
            .finish()
    }
}

impl BountyClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Session this client authenticates with.
    pub fn session(&self) -> &SharedSessionProvider {
        &self.inner.session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the bounties API.
    pub fn bounties(&self) -> BountiesApi {
        BountiesApi::new(self.clone())
    }

    /// Access the projects API.
    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    /// Access bookmark hydration.
    pub fn bookmarks(&self) -> BookmarksApi {
        BookmarksApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(&format!("api/{}", path))
            .map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(ApiRequest::new(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        let request = ApiRequest::new(Method::GET, path).query(query);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::POST, path).json(body)?;
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request whose response body is ignored.
    pub(crate) async fn post_empty<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::POST, path).json(body)?;
        self.execute(request).await?;
        Ok(())
    }

    /// Send a request, refreshing the session once on an expired token.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<reqwest::Response> {
        let token = self.inner.session.access_token();
        let response = self.send(&request, token.as_deref()).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status != StatusCode::UNAUTHORIZED || self.skips_refresh(&request.path) {
            return Err(self.extract_error(response).await);
        }

        let original = self.extract_error(response).await;
        tracing::debug!(path = %request.path, "access token rejected, attempting refresh");

        let Some(new_token) = self.recover_session(token.as_deref()).await else {
            return Err(original);
        };

        // The retried request goes straight back to the caller; a second 401
        // is surfaced without another refresh.
        let retried = self.send(&request, Some(&new_token)).await?;
        if retried.status().is_success() {
            Ok(retried)
        } else {
            Err(self.extract_error(retried).await)
        }
    }

    /// Send one attempt of a request with the given bearer token.
    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<reqwest::Response> {
        let url = self.url(&request.path)?;
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .timeout(self.inner.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        tracing::trace!(method = %request.method, path = %request.path, "sending request");
        Ok(builder.send().await?)
    }

    /// Whether a 401 on `path` must be surfaced without refreshing.
    fn skips_refresh(&self, path: &str) -> bool {
        let path = format!("/{}", path.trim_start_matches('/'));
        self.inner
            .no_refresh_paths
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }

    /// Obtain a fresh access token after a 401, or `None` if the session
    /// cannot be recovered. A failed refresh logs the session out.
    async fn recover_session(&self, stale_token: Option<&str>) -> Option<String> {
        let _guard = if self.inner.coalesce_refresh {
            let guard = self.inner.refresh_lock.lock().await;
            // Another request rotated the tokens while this one waited.
            if let Some(current) = self.inner.session.access_token()
                && Some(current.as_str()) != stale_token
            {
                tracing::debug!("token already refreshed by a concurrent request");
                return Some(current);
            }
            Some(guard)
        } else {
            None
        };

        let Some(refresh_token) = self.inner.session.refresh_token() else {
            tracing::debug!("no refresh token available");
            return None;
        };

        let stored = match self.request_refresh(&refresh_token).await {
            Ok(pair) => self.store_tokens(&pair, &refresh_token),
            Err(e) => Err(e),
        };

        match stored {
            Ok(access_token) => {
                tracing::info!("session refreshed");
                Some(access_token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed, logging out");
                if let Err(e) = self.inner.session.logout() {
                    tracing::warn!(error = %e, "failed to clear session");
                }
                None
            }
        }
    }

    /// Write a refreshed pair into the session, keeping the old refresh token
    /// when the backend did not rotate it.
    fn store_tokens(&self, pair: &TokenPair, previous_refresh: &str) -> Result<String> {
        let refresh_token = pair.refresh_token.as_deref().unwrap_or(previous_refresh);
        self.inner
            .session
            .set_tokens(&pair.access_token, refresh_token)?;
        Ok(pair.access_token.clone())
    }

    /// Call the refresh endpoint on the isolated client.
    async fn request_refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let url = self.url(REFRESH_PATH)?;
        let response = self
            .inner
            .refresh_http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .timeout(self.inner.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        let body: serde_json::Value = response.json().await?;
        normalize_tokens(&body).ok_or_else(|| {
            Error::UnexpectedResponse("refresh response carried no access token".to_string())
        })
    }

    /// Refresh the session explicitly using the stored refresh token.
    pub(crate) async fn refresh_session(&self) -> Result<Session> {
        let refresh_token = self
            .inner
            .session
            .refresh_token()
            .ok_or_else(|| Error::Auth("no refresh token stored".to_string()))?;

        let pair = self.request_refresh(&refresh_token).await?;
        self.store_tokens(&pair, &refresh_token)?;
        self.inner
            .session
            .session()
            .ok_or_else(|| Error::Auth("session vanished during refresh".to_string()))
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let parsed: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();

        let message = parsed
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            401 => Error::Auth(message),
            404 => Error::NotFound(message),
            _ => Error::Api {
                status,
                code: parsed.code.unwrap_or_else(|| "unknown".to_string()),
                message,
            },
        }
    }
}

/// Builder for creating a BountyClient.
pub struct ClientBuilder {
    base_url: Option<String>,
    session: Option<SharedSessionProvider>,
    auth_token: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    no_refresh_paths: Vec<String>,
    coalesce_refresh: bool,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            session: None,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            no_refresh_paths: DEFAULT_NO_REFRESH_PATHS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            coalesce_refresh: true,
        }
    }

    /// Set the backend base URL (the `/api` prefix is added per request).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session provider.
    pub fn session(mut self, session: SharedSessionProvider) -> Self {
        self.session = Some(session);
        self
    }

    /// Use a fixed access token with no refresh capability.
    ///
    /// Ignored when a session provider is also set.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Replace the list of path fragments exempt from refresh handling.
    pub fn no_refresh_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.no_refresh_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Share one refresh between requests that hit 401 concurrently
    /// (default `true`). With `false`, every failing request refreshes on
    /// its own.
    pub fn coalesce_refresh(mut self, coalesce: bool) -> Self {
        self.coalesce_refresh = coalesce;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BountyClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("bountyboard-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers.clone())
            .user_agent(user_agent.clone())
            .build()?;
        let refresh_http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        let session = match (self.session, self.auth_token) {
            (Some(session), _) => session,
            (None, Some(token)) => {
                Arc::new(InMemorySession::with_session(Session::new(token, "")))
            }
            (None, None) => Arc::new(InMemorySession::new()),
        };

        Ok(BountyClient {
            inner: Arc::new(ClientInner {
                http,
                refresh_http,
                base_url,
                timeout: self.timeout,
                session,
                no_refresh_paths: self.no_refresh_paths,
                coalesce_refresh: self.coalesce_refresh,
                refresh_lock: Mutex::new(()),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
