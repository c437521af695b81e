use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Name of the server-side backend URL variable used by the proxy routes.
pub const BACKEND_API_BASE_URL: &str = "BACKEND_API_BASE_URL";
/// Name of the backend URL variable used for direct API calls.
pub const PUBLIC_API_URL: &str = "PUBLIC_API_URL";

/// Application configuration loaded from environment variables.
///
/// Both backend URLs are optional at startup. A missing value is reported
/// per request (HTTP 500 from the proxy, a `RequestError::Config` from the
/// client), never replaced by a default.
#[derive(Debug, Clone)]
pub struct Config {
    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Backend
    pub backend_api_base_url: Option<String>,
    pub public_api_url: Option<String>,
    /// Origin the page handlers use to reach this server's own proxy routes
    pub public_origin: String,

    // Data fetching
    pub query_retry: u32,
    pub query_stale_time: Duration,

    // Cookies
    pub secure_cookies: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let web_port = parse_env_u16("WEB_PORT", 3000)?;
        let default_origin = format!("http://127.0.0.1:{web_port}");

        Ok(Self {
            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port,

            // Backend
            backend_api_base_url: optional_env(BACKEND_API_BASE_URL),
            public_api_url: optional_env(PUBLIC_API_URL),
            public_origin: env_or_default("PUBLIC_ORIGIN", &default_origin),

            // Data fetching
            query_retry: parse_env_u32("QUERY_RETRY", 3)?,
            query_stale_time: Duration::from_secs(parse_env_u64("QUERY_STALE_SECS", 0)?),

            // Cookies
            secure_cookies: parse_env_bool("SECURE_COOKIES", false)?,
        })
    }

    /// Configuration for tests: no backend URLs, no retries.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            web_host: "127.0.0.1".to_string(),
            web_port: 3000,
            backend_api_base_url: None,
            public_api_url: None,
            public_origin: "http://127.0.0.1:3000".to_string(),
            query_retry: 0,
            query_stale_time: Duration::ZERO,
            secure_cookies: false,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            (BACKEND_API_BASE_URL, self.backend_api_base_url.as_deref()),
            (PUBLIC_API_URL, self.public_api_url.as_deref()),
            ("PUBLIC_ORIGIN", Some(self.public_origin.as_str())),
        ];
        for (name, value) in urls {
            if let Some(value) = value {
                url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

/// Strip trailing slashes so paths can be appended with a leading `/`.
#[must_use]
pub fn trim_base_url(raw: &str) -> &str {
    raw.trim_end_matches('/')
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
