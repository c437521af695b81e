//! Home page state: recommended feed, search results and their paging.
//!
//! Two modes share the page. Search mode is active exactly when a
//! non-blank query has been committed; otherwise the recommended feed is
//! shown. Each mode keeps its own page counter, so leaving a search returns
//! the reader to the feed page they were on.

use serde::{Deserialize, Deserializer};

use crate::api::{ListParams, PaginatedPosts, SearchParams, MOST_LIKED_LIMIT};
use crate::query::{Hooks, QueryState};

/// Posts per page in both modes.
pub const PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    Feed,
    Search,
}

/// Home page state as carried in the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HomeParams {
    /// Committed search query
    pub q: Option<String>,
    /// Search results page
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<u32>,
    /// Recommended feed page
    #[serde(default, deserialize_with = "lenient_page")]
    pub feed: Option<u32>,
}

/// A page number that does not parse counts as absent.
fn lenient_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|page| page.trim().parse().ok()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedController {
    input: String,
    committed: String,
    recommended_page: u32,
    search_page: u32,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: String::new(),
            committed: String::new(),
            recommended_page: 1,
            search_page: 1,
        }
    }

    /// Restore state from URL parameters. The input box shows the
    /// committed query.
    #[must_use]
    pub fn from_params(params: &HomeParams) -> Self {
        let committed = params.q.clone().unwrap_or_default();
        Self {
            input: committed.clone(),
            committed,
            recommended_page: params.feed.unwrap_or(1).max(1),
            search_page: params.page.unwrap_or(1).max(1),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn committed_query(&self) -> &str {
        &self.committed
    }

    #[must_use]
    pub fn recommended_page(&self) -> u32 {
        self.recommended_page
    }

    #[must_use]
    pub fn search_page(&self) -> u32 {
        self.search_page
    }

    /// Update the search box without changing what is displayed.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// Commit the input as the active query and start at its first page.
    pub fn submit_search(&mut self) {
        self.committed = self.input.clone();
        self.search_page = 1;
    }

    /// Leave search mode. The feed page counter is untouched.
    pub fn clear_search(&mut self) {
        self.input.clear();
        self.committed.clear();
        self.search_page = 1;
    }

    #[must_use]
    pub fn mode(&self) -> FeedMode {
        if self.committed.trim().is_empty() {
            FeedMode::Feed
        } else {
            FeedMode::Search
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.mode() == FeedMode::Search
    }

    /// Page of the active mode.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        match self.mode() {
            FeedMode::Feed => self.recommended_page,
            FeedMode::Search => self.search_page,
        }
    }

    /// Set the active mode's page. Page numbers start at 1.
    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        match self.mode() {
            FeedMode::Feed => self.recommended_page = page,
            FeedMode::Search => self.search_page = page,
        }
    }

    /// Step back one page. Returns false (and does nothing) on page 1.
    pub fn previous(&mut self) -> bool {
        match previous_page(self.current_page()) {
            Some(page) => {
                self.set_page(page);
                true
            }
            None => false,
        }
    }

    /// Step forward one page. Returns false (and does nothing) on the
    /// last page.
    pub fn next(&mut self, last_page: u32) -> bool {
        match next_page(self.current_page(), last_page) {
            Some(page) => {
                self.set_page(page);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn recommended_params(&self) -> ListParams {
        ListParams::new(PAGE_SIZE, self.recommended_page)
    }

    #[must_use]
    pub fn most_liked_params(&self) -> ListParams {
        ListParams::new(MOST_LIKED_LIMIT, 1)
    }

    #[must_use]
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            query: self.committed.clone(),
            list: ListParams::new(PAGE_SIZE, self.search_page),
        }
    }

    /// URL for this state, omitting defaults.
    #[must_use]
    pub fn href(&self) -> String {
        let mut params = Vec::new();
        if self.is_searching() {
            params.push(format!("q={}", urlencoding::encode(&self.committed)));
            if self.search_page > 1 {
                params.push(format!("page={}", self.search_page));
            }
        }
        if self.recommended_page > 1 {
            params.push(format!("feed={}", self.recommended_page));
        }

        if params.is_empty() {
            "/".to_string()
        } else {
            format!("/?{}", params.join("&"))
        }
    }

    /// URL for another page of the active mode.
    #[must_use]
    pub fn href_for_page(&self, page: u32) -> String {
        let mut next = self.clone();
        next.set_page(page);
        next.href()
    }

    /// URL that leaves search mode and returns to the same feed page.
    #[must_use]
    pub fn clear_search_href(&self) -> String {
        let mut next = self.clone();
        next.clear_search();
        next.href()
    }

    /// Fetch everything the home page shows for the current state.
    ///
    /// The listing and the most-liked panel are fetched concurrently. The
    /// panel is hidden in search mode and not fetched.
    pub async fn load(&self, hooks: &Hooks) -> HomeView {
        let posts_observer = hooks.list_observer();
        let most_liked_observer = hooks.list_observer();

        let posts = async {
            match self.mode() {
                FeedMode::Feed => {
                    hooks
                        .recommended_posts(&posts_observer, self.recommended_params())
                        .await
                }
                FeedMode::Search => {
                    hooks
                        .search_posts(&posts_observer, self.search_params(), true)
                        .await
                }
            }
        };
        let most_liked = async {
            match self.mode() {
                FeedMode::Feed => Some(
                    hooks
                        .most_liked_posts(&most_liked_observer, self.most_liked_params())
                        .await,
                ),
                FeedMode::Search => None,
            }
        };
        let (posts, most_liked) = tokio::join!(posts, most_liked);

        HomeView {
            controller: self.clone(),
            posts,
            most_liked,
        }
    }
}

/// Page numbers shown by the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    pub ellipsis: bool,
}

impl PageWindow {
    /// All pages when there are at most three, otherwise `1 2 3 …`.
    #[must_use]
    pub fn for_last_page(last_page: u32) -> Self {
        if last_page <= 3 {
            Self {
                pages: (1..=last_page).collect(),
                ellipsis: false,
            }
        } else {
            Self {
                pages: vec![1, 2, 3],
                ellipsis: true,
            }
        }
    }
}

/// Page before `current`, unless already on the first page.
#[must_use]
pub fn previous_page(current: u32) -> Option<u32> {
    (current > 1).then(|| current - 1)
}

/// Page after `current`, unless already on `last_page`.
#[must_use]
pub fn next_page(current: u32, last_page: u32) -> Option<u32> {
    (current < last_page).then(|| current + 1)
}

/// Everything the home page renders.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub controller: FeedController,
    pub posts: QueryState<PaginatedPosts>,
    /// `None` while searching: the panel is hidden.
    pub most_liked: Option<QueryState<PaginatedPosts>>,
}

impl HomeView {
    #[must_use]
    pub fn heading(&self) -> String {
        if self.controller.is_searching() {
            format!("Result for \"{}\"", self.controller.committed_query())
        } else {
            "Recommended For You".to_string()
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.posts.is_loading()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.posts.is_error()
    }

    #[must_use]
    pub fn show_empty_state(&self) -> bool {
        show_empty_state(
            self.controller.mode(),
            self.posts.is_loading(),
            self.posts.data(),
        )
    }

    #[must_use]
    pub fn last_page(&self) -> u32 {
        self.posts.data().map_or(1, |p| p.last_page.max(1))
    }

    #[must_use]
    pub fn page_window(&self) -> PageWindow {
        PageWindow::for_last_page(self.last_page())
    }
}

/// Whether to replace the list with the "no results" view.
///
/// Checks the result list itself, not `total`.
#[must_use]
pub fn show_empty_state(mode: FeedMode, is_loading: bool, result: Option<&PaginatedPosts>) -> bool {
    mode == FeedMode::Search && !is_loading && result.is_some_and(|r| r.data.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Author, Post};

    fn post(id: u64) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            content: "<p>body</p>".to_string(),
            tags: vec![],
            image_url: None,
            author: Author {
                id: 1,
                name: "Ana".to_string(),
                username: "ana".to_string(),
                headline: None,
                avatar_url: None,
                email: None,
            },
            created_at: "2025-05-27T10:00:00Z".to_string(),
            likes: 0,
            comments: 0,
        }
    }

    fn result(data: Vec<Post>, total: u64) -> PaginatedPosts {
        PaginatedPosts {
            data,
            total,
            page: 1,
            last_page: 1,
        }
    }

    #[test]
    fn test_page_window_small() {
        for last in 0..=3 {
            let window = PageWindow::for_last_page(last);
            assert_eq!(window.pages, (1..=last).collect::<Vec<_>>());
            assert!(!window.ellipsis);
        }
    }

    #[test]
    fn test_page_window_large() {
        for last in [4, 5, 10, 100] {
            let window = PageWindow::for_last_page(last);
            assert_eq!(window.pages, vec![1, 2, 3]);
            assert!(window.ellipsis);
        }
    }

    #[test]
    fn test_previous_next_guards() {
        assert_eq!(previous_page(1), None);
        assert_eq!(previous_page(2), Some(1));
        assert_eq!(next_page(4, 4), None);
        assert_eq!(next_page(2, 4), Some(3));
    }

    #[test]
    fn test_previous_at_first_page_is_noop() {
        let mut c = FeedController::new();
        assert!(!c.previous());
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_next_at_last_page_is_noop() {
        let mut c = FeedController::new();
        c.set_page(4);
        assert!(!c.next(4));
        assert_eq!(c.current_page(), 4);
        assert!(c.previous());
        assert_eq!(c.current_page(), 3);
    }

    #[test]
    fn test_middle_page_scenario() {
        let mut c = FeedController::new();
        c.set_page(2);
        let last_page = 4;
        assert_eq!(previous_page(c.current_page()), Some(1));
        assert_eq!(next_page(c.current_page(), last_page), Some(3));
        let window = PageWindow::for_last_page(last_page);
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(window.ellipsis);
        assert!(window.pages.contains(&c.current_page()));
    }

    #[test]
    fn test_submit_search_switches_mode_and_resets_page() {
        let mut c = FeedController::new();
        c.set_page(3);
        c.set_input("rust");
        assert_eq!(c.mode(), FeedMode::Feed);

        c.submit_search();
        assert_eq!(c.mode(), FeedMode::Search);
        assert_eq!(c.current_page(), 1);

        c.set_page(2);
        assert_eq!(c.search_page(), 2);
        assert_eq!(c.recommended_page(), 3);

        c.set_input("rust async");
        c.submit_search();
        assert_eq!(c.search_page(), 1);
        assert_eq!(c.committed_query(), "rust async");
    }

    #[test]
    fn test_typing_does_not_commit() {
        let mut c = FeedController::new();
        c.set_input("draft");
        assert_eq!(c.committed_query(), "");
        assert!(!c.is_searching());
    }

    #[test]
    fn test_clear_search_keeps_feed_page() {
        let mut c = FeedController::new();
        c.set_page(3);
        c.set_input("rust");
        c.submit_search();
        c.set_page(2);

        c.clear_search();
        assert_eq!(c.mode(), FeedMode::Feed);
        assert_eq!(c.input(), "");
        assert_eq!(c.current_page(), 3);
        assert_eq!(c.search_page(), 1);
    }

    #[test]
    fn test_blank_query_stays_in_feed_mode() {
        let mut c = FeedController::new();
        c.set_input("   ");
        c.submit_search();
        assert_eq!(c.mode(), FeedMode::Feed);
    }

    #[test]
    fn test_empty_state_predicate() {
        let empty = result(vec![], 0);
        let non_empty_zero_total = result(vec![post(1)], 0);

        assert!(show_empty_state(FeedMode::Search, false, Some(&empty)));
        assert!(!show_empty_state(FeedMode::Search, true, Some(&empty)));
        assert!(!show_empty_state(FeedMode::Feed, false, Some(&empty)));
        assert!(!show_empty_state(FeedMode::Search, false, None));
        assert!(!show_empty_state(
            FeedMode::Search,
            false,
            Some(&non_empty_zero_total)
        ));
    }

    #[test]
    fn test_from_params_and_href() {
        let params = HomeParams {
            q: Some("rust web".to_string()),
            page: Some(2),
            feed: Some(3),
        };
        let c = FeedController::from_params(&params);
        assert!(c.is_searching());
        assert_eq!(c.input(), "rust web");
        assert_eq!(c.current_page(), 2);
        assert_eq!(c.href(), "/?q=rust%20web&page=2&feed=3");
        assert_eq!(c.href_for_page(1), "/?q=rust%20web&feed=3");
        assert_eq!(c.clear_search_href(), "/?feed=3");
    }

    #[test]
    fn test_from_params_clamps_zero_page() {
        let params = HomeParams {
            q: None,
            page: Some(0),
            feed: Some(0),
        };
        let c = FeedController::from_params(&params);
        assert_eq!(c.current_page(), 1);
        assert_eq!(c.href(), "/");
        assert_eq!(c.href_for_page(2), "/?feed=2");
    }

    #[test]
    fn test_unparsable_page_falls_back_to_first() {
        let params: HomeParams = serde_json::from_value(serde_json::json!({
            "q": "rust",
            "page": "abc",
            "feed": "",
        }))
        .unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.feed, None);

        let params: HomeParams =
            serde_json::from_value(serde_json::json!({"page": "4", "feed": " 2 "})).unwrap();
        assert_eq!(params.page, Some(4));
        assert_eq!(params.feed, Some(2));
    }

    #[test]
    fn test_request_params() {
        let mut c = FeedController::new();
        c.set_page(2);
        assert_eq!(c.recommended_params(), ListParams::new(5, 2));
        assert_eq!(c.most_liked_params(), ListParams::new(3, 1));
        c.set_input("q");
        c.submit_search();
        assert_eq!(c.search_params().list, ListParams::new(5, 1));
        assert_eq!(c.search_params().query, "q");
    }
}
