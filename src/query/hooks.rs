//! One query per backend operation, bound to its cache key.
//!
//! Each hook takes the observer that will hold its state. Hooks whose
//! required parameter is missing disable the observer instead of fetching.

use super::{keys, QueryCache, QueryObserver, QueryOptions, QueryState};
use crate::api::{ApiClient, Comment, ListParams, PaginatedPosts, Post, SearchParams, UserProfile};

#[derive(Clone)]
pub struct Hooks {
    client: ApiClient,
    cache: QueryCache,
    options: QueryOptions,
}

impl Hooks {
    #[must_use]
    pub fn new(client: ApiClient, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            client,
            cache,
            options,
        }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Observer for paginated listings: keeps the previous page visible
    /// while the next one loads.
    #[must_use]
    pub fn list_observer(&self) -> QueryObserver<PaginatedPosts> {
        QueryObserver::new(self.cache.clone(), self.options.clone().keep_previous_data())
    }

    #[must_use]
    pub fn observer<T: Send + Sync + 'static>(&self) -> QueryObserver<T> {
        QueryObserver::new(self.cache.clone(), self.options.clone())
    }

    /// Observer for optional page panels: a single attempt, so a missing
    /// item never holds the page back for the retry schedule.
    #[must_use]
    pub fn best_effort_observer<T: Send + Sync + 'static>(&self) -> QueryObserver<T> {
        QueryObserver::new(self.cache.clone(), self.options.clone().retry(0))
    }

    /// Observer for the current user. Never retries, so anonymous visitors
    /// do not trigger repeated 401s.
    #[must_use]
    pub fn current_user_observer(&self) -> QueryObserver<UserProfile> {
        QueryObserver::new(self.cache.clone(), self.options.clone().retry(0))
    }

    pub async fn recommended_posts(
        &self,
        observer: &QueryObserver<PaginatedPosts>,
        params: ListParams,
    ) -> QueryState<PaginatedPosts> {
        let client = self.client.clone();
        observer
            .fetch(keys::recommended(&params), move || {
                let client = client.clone();
                async move { client.recommended_posts(params).await }
            })
            .await
    }

    pub async fn most_liked_posts(
        &self,
        observer: &QueryObserver<PaginatedPosts>,
        params: ListParams,
    ) -> QueryState<PaginatedPosts> {
        let client = self.client.clone();
        observer
            .fetch(keys::most_liked(&params), move || {
                let client = client.clone();
                async move { client.most_liked_posts(params).await }
            })
            .await
    }

    pub async fn search_posts(
        &self,
        observer: &QueryObserver<PaginatedPosts>,
        params: SearchParams,
        enabled: bool,
    ) -> QueryState<PaginatedPosts> {
        if !enabled {
            observer.disable();
            return observer.state();
        }
        let key = keys::search(&params);
        let client = self.client.clone();
        observer
            .fetch(key, move || {
                let client = client.clone();
                let params = params.clone();
                async move { client.search_posts(&params).await }
            })
            .await
    }

    pub async fn post_detail(&self, observer: &QueryObserver<Post>, id: Option<u64>) -> QueryState<Post> {
        let Some(id) = id else {
            observer.disable();
            return observer.state();
        };
        let client = self.client.clone();
        observer
            .fetch(keys::detail(id), move || {
                let client = client.clone();
                async move { client.post(id).await }
            })
            .await
    }

    pub async fn post_comments(
        &self,
        observer: &QueryObserver<Vec<Comment>>,
        id: Option<u64>,
    ) -> QueryState<Vec<Comment>> {
        let Some(id) = id else {
            observer.disable();
            return observer.state();
        };
        let client = self.client.clone();
        observer
            .fetch(keys::comments(id), move || {
                let client = client.clone();
                async move { client.post_comments(id).await }
            })
            .await
    }

    pub async fn current_user(
        &self,
        observer: &QueryObserver<UserProfile>,
        token: Option<&str>,
    ) -> QueryState<UserProfile> {
        let Some(token) = token else {
            observer.disable();
            return observer.state();
        };
        let key = keys::me(token);
        let token = token.to_string();
        let client = self.client.clone();
        observer
            .fetch(key, move || {
                let client = client.clone();
                let token = token.clone();
                async move { client.current_user(&token).await }
            })
            .await
    }
}
