use thiserror::Error;

/// Failure of a single backend or proxy request.
///
/// The `Display` output is the human-readable message shown to users, so
/// every variant renders as exactly that message and nothing more.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A required base URL is not configured.
    #[error("{0} is not configured")]
    Config(&'static str),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    /// The request never produced a response.
    #[error("No response from server")]
    Network,
    /// Anything else, carrying the raw error description.
    #[error("{0}")]
    Other(String),
}

impl RequestError {
    /// Build an upstream error from a non-2xx response body.
    ///
    /// Prefers a string `message` field, then a string `error` field, and
    /// falls back to a generic message naming the status code.
    #[must_use]
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let message = field("message")
            .or_else(|| field("error"))
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        Self::Upstream { status, message }
    }

    /// Classify a transport-level failure from the HTTP client.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Network
        } else {
            Self::Other(err.to_string())
        }
    }

    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether another attempt could succeed. Client errors (except 408 and
    /// 429) and missing configuration give the same answer every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Upstream { status, .. } => {
                !(400..500).contains(status) || matches!(*status, 408 | 429)
            }
            Self::Network | Self::Other(_) => true,
        }
    }

    /// Whether the backend rejected the credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
