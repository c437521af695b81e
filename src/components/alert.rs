//! Alert components for inline status and error messages.

use maud::{html, Markup, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Error,
    Info,
}

impl AlertVariant {
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// An alert message.
///
/// # Example
///
/// ```ignore
/// use crate::components::alert::Alert;
///
/// let alert = Alert::error("Failed to load posts.");
/// ```
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn new(variant: AlertVariant, message: &'a str) -> Self {
        Self { variant, message }
    }

    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self::new(AlertVariant::Error, message)
    }

    #[must_use]
    pub const fn info(message: &'a str) -> Self {
        Self::new(AlertVariant::Info, message)
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        let role = match self.variant {
            AlertVariant::Error => "alert",
            AlertVariant::Info => "status",
        };
        html! {
            p class=(format!("alert {}", self.variant.class())) role=(role) {
                (self.message)
            }
        }
    }
}
