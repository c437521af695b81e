//! Locally cached display profiles, keyed by email.
//!
//! The backend's login response carries only a token, so the name given at
//! registration is remembered here and used to fill in the session's
//! display fields on the next login.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::storage::Storage;
use crate::api::UserProfile;

pub const PROFILES_KEY: &str = "userProfiles";

/// Display fields that may be missing from backend responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl DisplayProfile {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Combine two profiles field by field; `backend` always wins.
    #[must_use]
    pub fn merge(backend: &Self, cached: &Self) -> Self {
        Self {
            name: backend.name.clone().or_else(|| cached.name.clone()),
            username: backend.username.clone().or_else(|| cached.username.clone()),
            avatar_url: backend
                .avatar_url
                .clone()
                .or_else(|| cached.avatar_url.clone()),
        }
    }
}

impl From<&UserProfile> for DisplayProfile {
    fn from(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

type Book = BTreeMap<String, DisplayProfile>;

fn read_book<S: Storage + ?Sized>(storage: &S) -> Result<Book, serde_json::Error> {
    storage
        .get(PROFILES_KEY)
        .map_or_else(|| Ok(Book::new()), |raw| serde_json::from_str(&raw))
}

/// Record `profile` for `email`, replacing any earlier entry.
///
/// An unreadable book is reset to hold only this entry.
pub fn remember<S: Storage + ?Sized>(storage: &mut S, email: &str, profile: DisplayProfile) {
    let mut book = read_book(storage).unwrap_or_else(|e| {
        warn!("Discarding corrupt profile book: {e}");
        Book::new()
    });
    book.insert(email.to_string(), profile);

    match serde_json::to_string(&book) {
        Ok(raw) => storage.set(PROFILES_KEY, raw),
        Err(e) => warn!("Failed to serialize profile book: {e}"),
    }
}

/// Cached profile for `email`. An unreadable book yields nothing.
#[must_use]
pub fn lookup<S: Storage + ?Sized>(storage: &S, email: &str) -> Option<DisplayProfile> {
    match read_book(storage) {
        Ok(mut book) => book.remove(email),
        Err(e) => {
            warn!("Ignoring corrupt profile book: {e}");
            None
        }
    }
}
