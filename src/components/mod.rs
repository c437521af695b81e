//! Maud HTML template components for the web UI.
//!
//! - `layout`: base page layout, header search and auth navigation
//! - `alert`: inline status and error messages
//! - `card`: article cards, avatars and the empty state
//! - `comments`: comment list and composer
//! - `form`: form elements
//! - `pagination`: page navigation for the home feed

pub mod alert;
pub mod card;
pub mod comments;
pub mod form;
pub mod layout;
pub mod pagination;

pub use alert::{Alert, AlertVariant};
pub use card::{ArticleCard, Avatar, EmptyState, Engagement, MostLikedCard, TagList};
pub use comments::{CommentComposer, CommentList};
pub use form::{Form, FormGroup, Input, TextArea};
pub use layout::BaseLayout;
pub use pagination::Pagination;

/// Re-export maud for convenience
pub use maud::{html, Markup, PreEscaped, Render, DOCTYPE};
