//! Page controllers: UI state for each page and the queries it needs.

pub mod auth;
pub mod detail;
pub mod home;

pub use auth::{AuthFlowError, FieldErrors, LoginForm, RegisterForm};
pub use detail::{CommentLimit, DetailController, DetailParams, DetailView};
pub use home::{FeedController, FeedMode, HomeParams, HomeView, PageWindow};
