//! reqwest-backed `AuthApi` implementation.

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{
    Acknowledgement, AuthApi, AuthGrant, Credentials, Operation, ProfilePatch, ProfileRecord,
    RegistrationInput,
};
use crate::config::Config;
use crate::error::{ClientError, ClientResult, ErrorKind};

/// Standard User-Agent header for authdesk requests.
pub const USER_AGENT: &str = concat!("authdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the auth service rooted at a base URL (e.g. `.../api/auth`).
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Creates a client with the HTTP client's default timeout (none).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, reqwest::Client::builder())
    }

    /// Creates a client from configuration (base URL precedence + timeout).
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.effective_base_url()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self::build(&base_url, builder)
    }

    fn build(base_url: &str, builder: reqwest::ClientBuilder) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must be an http(s) URL: {base_url}");
        }
        let http = builder
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Builds the request for `op`. The token is attached only to operations
    /// that require auth.
    fn request(
        &self,
        op: Operation,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(op = %op, %method, %url, "sending request");
        let request = self.http.request(method, url);
        match token {
            Some(token) if op.requires_auth() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// Sends the request and returns the body of a successful response.
    async fn execute(&self, op: Operation, request: RequestBuilder) -> ClientResult<String> {
        let response = request.send().await.map_err(|e| {
            warn!(op = %op, error = %e, "request failed before a response");
            ClientError::new(ErrorKind::Network, op.fallback_message())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(op = %op, error = %e, "failed to read response body");
            ClientError::new(ErrorKind::Network, op.fallback_message())
        })?;

        if status.is_success() {
            debug!(op = %op, status = status.as_u16(), "request succeeded");
            Ok(body)
        } else {
            let err = ClientError::from_status(status.as_u16(), &body, op.fallback_message());
            warn!(op = %op, status = status.as_u16(), kind = %err.kind, "request rejected");
            Err(err)
        }
    }

    fn decode<T: DeserializeOwned>(op: Operation, body: &str) -> ClientResult<T> {
        serde_json::from_str(body).map_err(|e| {
            warn!(op = %op, error = %e, "unexpected response body");
            ClientError::new(ErrorKind::Server, op.fallback_message())
        })
    }
}

impl AuthApi for HttpClient {
    async fn register(&self, input: &RegistrationInput) -> ClientResult<AuthGrant> {
        let op = Operation::Register;
        let request = self.request(op, Method::POST, &["register"], None).json(input);
        let body = self.execute(op, request).await?;
        Self::decode(op, &body)
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        let op = Operation::Login;
        let request = self.request(op, Method::POST, &["login"], None).json(credentials);
        let body = self.execute(op, request).await?;
        Self::decode(op, &body)
    }

    async fn fetch_profile(&self, user_id: &str, token: &str) -> ClientResult<ProfileRecord> {
        let op = Operation::FetchProfile;
        let request = self.request(op, Method::GET, &["profile", user_id], Some(token));
        let body = self.execute(op, request).await?;
        let mut record: ProfileRecord = Self::decode(op, &body)?;
        if record.user_id.is_empty() {
            record.user_id = user_id.to_string();
        }
        Ok(record)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        token: &str,
    ) -> ClientResult<ProfileRecord> {
        let op = Operation::UpdateProfile;
        let request = self
            .request(op, Method::PUT, &["profile", user_id], Some(token))
            .json(patch);
        let body = self.execute(op, request).await?;
        let mut record: ProfileRecord = Self::decode(op, &body)?;
        if record.user_id.is_empty() {
            record.user_id = user_id.to_string();
        }
        Ok(record)
    }

    async fn logout(&self, token: &str) -> ClientResult<Acknowledgement> {
        let op = Operation::Logout;
        let request = self
            .request(op, Method::POST, &["logout"], Some(token))
            .json(&serde_json::json!({}));
        let body = self.execute(op, request).await?;
        // Any 2xx is an acknowledgement, whatever the body looks like.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}
