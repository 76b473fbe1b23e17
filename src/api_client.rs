use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time::{Duration, Instant};

/// Header the target API reads the credential from.
pub const AUTH_HEADER: &str = "basicAuth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Post,
    Get,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Post => "POST",
            RequestMethod::Get => "GET",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Which value, if any, goes into the credential header.
#[derive(Debug, Clone)]
pub enum Credential {
    /// The key the client was configured with
    Configured,
    Omitted,
    Explicit(Secret<String>),
}

#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: RequestMethod,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub credential: Credential,
}

impl RequestSpec {
    pub fn new(method: RequestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            credential: Credential::Configured,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, path)
    }

    pub fn json<Body>(mut self, body: &Body) -> Result<Self, ApiClientError>
    where
        Body: serde::Serialize,
    {
        self.body = Some(serde_json::to_value(body).map_err(ApiClientError::Body)?);
        Ok(self)
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = Credential::Omitted;
        self
    }

    pub fn with_credential(mut self, value: Secret<String>) -> Self {
        self.credential = Credential::Explicit(value);
        self
    }

    /// `METHOD /path`, used to label log lines and assertion failures.
    pub fn request_line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// What came back from a single call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub request_line: String,
    pub status: StatusCode,
    /// `None` when the body is empty or not JSON
    pub body: Option<serde_json::Value>,
    pub elapsed: Duration,
}

#[derive(thiserror::Error)]
pub enum ApiClientError {
    #[error("Failed to serialize the request body")]
    Body(#[source] serde_json::Error),
    #[error("{0} could not be sent")]
    Transport(String, #[source] reqwest::Error),
}

impl std::fmt::Debug for ApiClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::utils::error_chain_fmt(self, f)
    }
}

/// Dispatches `RequestSpec`s against the user API, one call at a time.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    auth_key: Secret<String>,
}

impl ApiClient {
    /// No timeout is configured: slow calls are measured, never aborted.
    pub fn new(base_url: String, auth_key: Secret<String>) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            auth_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(
        name = "Sending API request",
        skip_all,
        fields(request = %request.request_line(), status = tracing::field::Empty)
    )]
    pub async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, ApiClientError> {
        let request_line = request.request_line();
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http_client
            .request(request.method.into(), &url)
            .header("Content-Type", "application/json");
        builder = match &request.credential {
            Credential::Configured => builder.header(AUTH_HEADER, self.auth_key.expose_secret()),
            Credential::Explicit(value) => builder.header(AUTH_HEADER, value.expose_secret()),
            Credential::Omitted => builder,
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| ApiClientError::Transport(request_line.clone(), e))?;
        let status = response.status();
        let raw_body = response
            .bytes()
            .await
            .map_err(|e| ApiClientError::Transport(request_line.clone(), e))?;
        let elapsed = started.elapsed();

        tracing::Span::current().record("status", status.as_u16());
        tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Received response");

        Ok(ApiResponse {
            request_line,
            status,
            body: serde_json::from_slice(&raw_body).ok(),
            elapsed,
        })
    }
}
