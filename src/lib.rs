//! Inkwell blog front end.
//!
//! A server-rendered web UI for a blog backend: a home feed with search and
//! pagination, article pages with comments, login and registration, and
//! thin proxy routes onto the backend's post listings.

#![allow(clippy::needless_raw_string_hashes)]

pub mod api;
pub mod components;
pub mod config;
pub mod controllers;
pub mod query;
pub mod session;
pub mod text;
pub mod web;
