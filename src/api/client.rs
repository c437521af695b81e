//! HTTP client for the posts backend and this server's own proxy routes.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use super::error::RequestError;
use crate::config::{trim_base_url, Config, PUBLIC_API_URL};

/// Where a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The external backend, reached directly.
    Backend,
    /// This server's `/api/...` proxy routes.
    Local,
}

/// Per-request options: method, query string, JSON body and bearer token.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A POST with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn post<B: Serialize>(body: &B) -> Result<Self, RequestError> {
        let body = serde_json::to_value(body).map_err(|e| RequestError::Other(e.to_string()))?;
        Ok(Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }
}

/// Single-attempt HTTP client with normalized error messages.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: Option<String>,
    local_base: String,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("inkwell/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(
            http,
            config.public_api_url.as_deref(),
            &config.public_origin,
        ))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: reqwest::Client, api_base: Option<&str>, local_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.map(|b| trim_base_url(b).to_string()),
            local_base: trim_base_url(local_base).to_string(),
        }
    }

    fn url_for(&self, target: Target, endpoint: &str) -> Result<String, RequestError> {
        let base = match target {
            Target::Backend => self
                .api_base
                .as_deref()
                .ok_or(RequestError::Config(PUBLIC_API_URL))?,
            Target::Local => self.local_base.as_str(),
        };
        Ok(format!("{base}{endpoint}"))
    }

    /// Issue one request and decode a JSON response.
    ///
    /// Failures are logged and returned as a [`RequestError`] whose message
    /// is suitable for display.
    ///
    /// # Errors
    ///
    /// Returns an error on missing configuration, network failure, non-2xx
    /// status, or an undecodable body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        target: Target,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, RequestError> {
        let result = self.send(target, endpoint, options).await;
        if let Err(ref e) = result {
            error!(endpoint = %endpoint, "API fetch error: {e}");
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        target: Target,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, RequestError> {
        let url = self.url_for(target, endpoint)?;
        debug!(method = %options.method, url = %url, "Sending API request");

        let mut request = self
            .http
            .request(options.method, &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = options.body {
            request = request.json(&body);
        }
        if let Some(token) = options.bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::from_transport(&e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::from_transport(&e))?;

        if !status.is_success() {
            return Err(RequestError::from_error_body(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| RequestError::Other(e.to_string()))
    }
}
