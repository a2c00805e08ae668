// HTTP client for the remote REST API

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::remote::error::{extract_message, RemoteError};

/// Thin wrapper around `reqwest::Client` bound to the API base URL
///
/// No request timeout is configured; calls resolve or fail on the
/// transport's own defaults.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stayflow/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path (`/bookings`, `/rooms/3`, ...)
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request, forwarding the caller's bearer token when present
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.url(path);
        debug!("Remote request: {} {}", method, url);

        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body from a 2xx response
    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Like `send`, but an empty 2xx body decodes to `T::default()`
    pub async fn send_or_default<T: DeserializeOwned + Default>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Like `send`, but a 404 resolves to `None`
    pub async fn send_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, RemoteError> {
        match self.send(request).await {
            Ok(value) => Ok(Some(value)),
            Err(RemoteError::Status { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let message = extract_message(body);
    debug!("Remote API error {}: {:?}", status, message);

    RemoteError::Status {
        status: status.as_u16(),
        message,
    }
}
