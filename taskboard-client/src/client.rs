//! HTTP client wrapper for the Taskboard REST API.
//!
//! Every call goes through [`ApiClient::request`], which attaches the bearer
//! token, applies the configured timeout and normalizes whatever the backend
//! returns into an [`ApiResponse`].

use crate::auth::TokenProvider;
use crate::error::ClientError;
use crate::response::{normalize, ApiResponse};
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use taskboard_config::ApiConfig;
use tracing::{debug, instrument, warn};
use url::Url;

/// Body of an outgoing request
enum RequestBody<'a> {
    Empty,
    Json(&'a Value),
    Multipart(Form),
}

/// Client for the Taskboard backend.
///
/// Cheap to clone: the connection pool and token provider are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client from the `api` configuration section.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ClientError> {
        Self::build(&config.base_url, config.timeout(), &config.user_agent, tokens)
    }

    /// Creates a client with an explicit base URL and timeout.
    pub fn with_settings(
        base_url: impl AsRef<str>,
        timeout: Duration,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientError> {
        let user_agent = format!("taskboard/{}", env!("CARGO_PKG_VERSION"));
        Self::build(base_url.as_ref(), timeout, &user_agent, tokens)
    }

    fn build(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientError> {
        Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path, with optional query pairs
    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        let mut url =
            Url::parse(&joined).map_err(|e| ClientError::InvalidUrl(format!("{joined}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Sends a request and normalizes the response.
    ///
    /// Backend failures (non-2xx) are returned as `Ok` with `success == false`;
    /// only transport problems are `Err`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let body = body.map_or(RequestBody::Empty, RequestBody::Json);
        self.send(method, path, &[], body).await
    }

    #[instrument(skip(self, query, body), fields(base_url = %self.base_url))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody<'_>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        debug!(%method, %url, "Sending API request");

        let mut request = self.authorize(self.client.request(method, url));
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| {
            let error = ClientError::from_transport(e);
            warn!(path, %error, "API request failed");
            error
        })?;

        let status = response.status();
        let is_json = is_json_response(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(ClientError::from_transport)?;

        let normalized = normalize(status, is_json, &bytes)?;
        if normalized.success {
            debug!(path, status = status.as_u16(), "API request succeeded");
        } else {
            debug!(
                path,
                status = status.as_u16(),
                message = %normalized.failure_message(),
                "API reported failure"
            );
        }
        Ok(normalized)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.request(Method::GET, path, None).await
    }

    /// `GET` with query-string parameters
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, ClientError> {
        self.send(Method::GET, path, query, RequestBody::Empty).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, ClientError> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, ClientError> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        self.request(Method::PATCH, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.request(Method::DELETE, path, None).await
    }

    /// `POST` a multipart form; reqwest sets the boundary header
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<ApiResponse, ClientError> {
        self.send(Method::POST, path, &[], RequestBody::Multipart(form))
            .await
    }
}

/// Missing content types are treated as JSON so bare bodies still parse
fn is_json_response(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_none_or(|ct| ct.contains("json"))
}
