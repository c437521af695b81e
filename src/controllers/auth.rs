//! Login and registration forms and the flows behind them.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::api::{ApiClient, LoginDto, RegisterDto, RequestError};
use crate::session::{profiles, AuthUser, DisplayProfile, Session, Storage};

/// Field name to validation message.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("invalid form")]
    Invalid(FieldErrors),
    #[error("registration failed: {0}")]
    Register(#[source] RequestError),
    #[error("login failed: {0}")]
    Login(#[source] RequestError),
}

impl AuthFlowError {
    /// Message shown above the form.
    #[must_use]
    pub fn user_message(&self, after_register: bool) -> Option<&'static str> {
        match self {
            Self::Invalid(_) => None,
            Self::Register(_) => Some("Registration failed. Please check your details."),
            Self::Login(_) if after_register => Some("Login after registration failed."),
            Self::Login(_) => Some("Login failed. User not found."),
        }
    }

    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.insert("email", "Email required");
        }
        if self.password.trim().is_empty() {
            errors.insert("password", "Password required");
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Name required");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "Email required");
        }
        if self.password.trim().is_empty() {
            errors.insert("password", "Password required");
        }
        if self.confirm_password.trim().is_empty() {
            errors.insert("confirm_password", "Confirm password required");
        } else if self.confirm_password != self.password {
            errors.insert(
                "confirm_password",
                "Confirm password does not match password",
            );
        }
        errors
    }
}

/// Validate, log in, backfill display fields from the profile book and
/// start the session.
///
/// # Errors
///
/// Returns field errors without contacting the backend, or the backend's
/// login failure.
pub async fn login<S: Storage>(
    client: &ApiClient,
    session: &mut Session<S>,
    form: &LoginForm,
) -> Result<(), AuthFlowError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AuthFlowError::Invalid(errors));
    }

    let payload = LoginDto {
        email: form.email.clone(),
        password: form.password.clone(),
    };
    let response = client.login(&payload).await.map_err(AuthFlowError::Login)?;

    let profile = profiles::lookup(session.storage(), &form.email).unwrap_or_default();
    session.login(AuthUser::new(&form.email, &response.token, profile));
    info!(email = %form.email, "User logged in");
    Ok(())
}

/// Validate, register, remember the chosen name, then log in with the same
/// credentials.
///
/// # Errors
///
/// Returns field errors, the registration failure, or the follow-up login
/// failure (in which case the account exists but the session is anonymous).
pub async fn register<S: Storage>(
    client: &ApiClient,
    session: &mut Session<S>,
    form: &RegisterForm,
) -> Result<(), AuthFlowError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AuthFlowError::Invalid(errors));
    }

    let payload = RegisterDto {
        name: form.name.clone(),
        username: None,
        email: form.email.clone(),
        password: form.password.clone(),
    };
    let registered = client
        .register(&payload)
        .await
        .map_err(AuthFlowError::Register)?;
    info!(email = %registered.email, "User registered");

    profiles::remember(
        session.storage_mut(),
        &form.email,
        DisplayProfile::named(&form.name),
    );

    let login_form = LoginForm {
        email: form.email.clone(),
        password: form.password.clone(),
    };
    login(client, session, &login_form).await
}
