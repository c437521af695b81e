//! Client for the external posts backend.
//!
//! Every endpoint goes through [`ApiClient::request`], which makes a single
//! attempt and turns any failure into a displayable [`RequestError`].
//! Recommended and most-liked listings are read through this server's own
//! proxy routes; everything else talks to the backend directly.

mod client;
mod error;
mod types;

pub use client::{ApiClient, RequestOptions, Target};
pub use error::RequestError;
pub use types::{
    Author, Comment, ListParams, LoginDto, LoginResponse, Paginated, PaginatedPosts, Post,
    RegisterDto, RegisterResponse, SearchParams, UserProfile,
};

/// Default page size for the recommended feed.
pub const RECOMMENDED_LIMIT: u32 = 5;
/// Default page size for the most-liked panel.
pub const MOST_LIKED_LIMIT: u32 = 3;
/// Default page size for search results.
pub const SEARCH_LIMIT: u32 = 5;

impl ApiClient {
    /// `GET /api/posts/recommended` on the local proxy.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn recommended_posts(&self, params: ListParams) -> Result<PaginatedPosts, RequestError> {
        let (limit, page) = params.resolve(RECOMMENDED_LIMIT);
        let options = RequestOptions::get().query("limit", limit).query("page", page);
        self.request(Target::Local, "/api/posts/recommended", options)
            .await
    }

    /// `GET /api/posts/most-liked` on the local proxy.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn most_liked_posts(&self, params: ListParams) -> Result<PaginatedPosts, RequestError> {
        let (limit, page) = params.resolve(MOST_LIKED_LIMIT);
        let options = RequestOptions::get().query("limit", limit).query("page", page);
        self.request(Target::Local, "/api/posts/most-liked", options)
            .await
    }

    /// `GET /posts/search` on the backend.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn search_posts(&self, params: &SearchParams) -> Result<PaginatedPosts, RequestError> {
        let (limit, page) = params.list.resolve(SEARCH_LIMIT);
        let options = RequestOptions::get()
            .query("query", &params.query)
            .query("limit", limit)
            .query("page", page);
        self.request(Target::Backend, "/posts/search", options).await
    }

    /// `GET /posts/{id}` on the backend.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post(&self, id: u64) -> Result<Post, RequestError> {
        self.request(Target::Backend, &format!("/posts/{id}"), RequestOptions::get())
            .await
    }

    /// `GET /posts/{id}/comments` on the backend.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_comments(&self, id: u64) -> Result<Vec<Comment>, RequestError> {
        self.request(
            Target::Backend,
            &format!("/posts/{id}/comments"),
            RequestOptions::get(),
        )
        .await
    }

    /// `GET /users/me` with the session's bearer token.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, RequestError> {
        self.request(Target::Backend, "/users/me", RequestOptions::get().bearer(token))
            .await
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn register(&self, payload: &RegisterDto) -> Result<RegisterResponse, RequestError> {
        self.request(Target::Backend, "/auth/register", RequestOptions::post(payload)?)
            .await
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn login(&self, payload: &LoginDto) -> Result<LoginResponse, RequestError> {
        self.request(Target::Backend, "/auth/login", RequestOptions::post(payload)?)
            .await
    }
}
