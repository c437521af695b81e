//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod auth;
pub mod detail;
pub mod home;

pub use auth::{render_login_page, render_register_page};
pub use detail::render_detail_page;
pub use home::render_home_page;
