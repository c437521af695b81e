//! Authentication session backed by durable client storage.
//!
//! A [`Session`] is built explicitly from a [`Storage`] for each request and
//! handed to whatever needs it. It is either anonymous or holds one
//! [`AuthUser`]; every transition is written through to storage at once.

pub mod profiles;
pub mod storage;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use profiles::DisplayProfile;
pub use storage::{CookieStorage, MemoryStorage, Storage};

pub const AUTH_KEY: &str = "auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub email: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl AuthUser {
    /// A user with display fields taken from `profile`.
    #[must_use]
    pub fn new(email: &str, token: &str, profile: DisplayProfile) -> Self {
        Self {
            email: email.to_string(),
            token: token.to_string(),
            name: profile.name,
            username: profile.username,
            avatar_url: profile.avatar_url,
        }
    }

    #[must_use]
    pub fn profile(&self) -> DisplayProfile {
        DisplayProfile {
            name: self.name.clone(),
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    /// Name to show in the header: name, then username, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug)]
pub struct Session<S: Storage> {
    storage: S,
    user: Option<AuthUser>,
}

impl<S: Storage> Session<S> {
    /// Seed the session from storage.
    ///
    /// A stored record that does not parse is removed and the session
    /// starts anonymous.
    pub fn load(mut storage: S) -> Self {
        let user = match storage.get(AUTH_KEY) {
            None => None,
            Some(raw) => match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Clearing corrupt stored session: {e}");
                    storage.remove(AUTH_KEY);
                    None
                }
            },
        };
        Self { storage, user }
    }

    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }

    /// Become authenticated as `user`, replacing any existing session.
    pub fn login(&mut self, user: AuthUser) {
        match serde_json::to_string(&user) {
            Ok(raw) => self.storage.set(AUTH_KEY, raw),
            Err(e) => warn!("Failed to persist session: {e}"),
        }
        debug!(email = %user.email, "Session started");
        self.user = Some(user);
    }

    /// Return to anonymous and forget the stored record.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            debug!(email = %user.email, "Session ended");
        }
        self.storage.remove(AUTH_KEY);
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> AuthUser {
        AuthUser::new("ana@x.com", "tok-1", DisplayProfile::named("Ana"))
    }

    #[test]
    fn test_empty_storage_is_anonymous() {
        let session = Session::load(MemoryStorage::new());
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_login_persists_and_reloads() {
        let mut session = Session::load(MemoryStorage::new());
        session.login(ana());

        let reloaded = Session::load(session.into_storage());
        assert_eq!(reloaded.user(), Some(&ana()));
        assert_eq!(reloaded.token(), Some("tok-1"));
    }

    #[test]
    fn test_login_overwrites_existing_session() {
        let mut session = Session::load(MemoryStorage::new());
        session.login(ana());
        session.login(AuthUser::new("bob@x.com", "tok-2", DisplayProfile::default()));

        let reloaded = Session::load(session.into_storage());
        assert_eq!(reloaded.user().map(|u| u.email.as_str()), Some("bob@x.com"));
    }

    #[test]
    fn test_logout_removes_record() {
        let mut session = Session::load(MemoryStorage::new());
        session.login(ana());
        session.logout();
        assert!(!session.is_authenticated());
        assert!(!session.storage().contains(AUTH_KEY));
    }

    #[test]
    fn test_corrupt_record_is_cleared() {
        let mut storage = MemoryStorage::new();
        storage.set(AUTH_KEY, "{\"email\":".to_string());

        let session = Session::load(storage);
        assert!(!session.is_authenticated());
        assert!(!session.storage().contains(AUTH_KEY));
    }

    #[test]
    fn test_record_missing_token_is_corrupt() {
        let mut storage = MemoryStorage::new();
        storage.set(AUTH_KEY, r#"{"email":"ana@x.com"}"#.to_string());

        let session = Session::load(storage);
        assert!(!session.is_authenticated());
        assert!(!session.storage().contains(AUTH_KEY));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = ana();
        assert_eq!(user.display_name(), "Ana");
        user.name = None;
        user.username = Some("ana".to_string());
        assert_eq!(user.display_name(), "ana");
        user.username = None;
        assert_eq!(user.display_name(), "ana@x.com");
    }

    #[test]
    fn test_serialized_field_names() {
        let mut user = ana();
        user.avatar_url = Some("https://img/a.png".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["avatarUrl"], "https://img/a.png");
        assert!(json.get("username").is_none());
    }
}
