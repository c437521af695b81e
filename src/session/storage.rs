//! Durable client-side key/value storage.
//!
//! In the browser this is the cookie jar: [`CookieStorage`] reads the
//! request's `Cookie` header and queues `Set-Cookie` headers for whatever
//! changed. [`MemoryStorage`] backs tests.

use std::collections::{BTreeMap, HashMap};

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use tracing::warn;

/// Cookies live for 30 days.
const COOKIE_MAX_AGE_SECS: i64 = 2_592_000;

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Cookie-backed storage for one request/response cycle.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    values: HashMap<String, String>,
    /// Pending writes; `None` deletes the cookie.
    changes: BTreeMap<String, Option<String>>,
    secure: bool,
}

impl CookieStorage {
    /// Read cookies from request headers. Values are percent-decoded.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        let mut values = HashMap::new();
        for header in headers.get_all(COOKIE) {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            for pair in raw.split(';') {
                let Some((name, value)) = pair.trim().split_once('=') else {
                    continue;
                };
                let value = urlencoding::decode(value)
                    .map_or_else(|_| value.to_string(), |v| v.into_owned());
                values.insert(name.to_string(), value);
            }
        }

        Self {
            values,
            changes: BTreeMap::new(),
            secure,
        }
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// `Set-Cookie` header values for every pending change.
    #[must_use]
    pub fn set_cookie_values(&self) -> Vec<String> {
        let secure = if self.secure { "; Secure" } else { "" };
        self.changes
            .iter()
            .map(|(name, value)| match value {
                Some(value) => format!(
                    "{name}={}; HttpOnly{secure}; SameSite=Lax; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}",
                    urlencoding::encode(value)
                ),
                None => format!("{name}=; HttpOnly{secure}; SameSite=Lax; Path=/; Max-Age=0"),
            })
            .collect()
    }

    /// Append pending `Set-Cookie` headers to a response.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        for cookie in self.set_cookie_values() {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => warn!("Skipping unencodable cookie: {e}"),
            }
        }
    }
}

impl Storage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value.clone());
        self.changes.insert(key.to_string(), Some(value));
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.changes.insert(key.to_string(), None);
    }
}
