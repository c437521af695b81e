//! Home page: recommended feed or search results, plus the most-liked panel.

use maud::{html, Markup};

use crate::api::PaginatedPosts;
use crate::components::{Alert, ArticleCard, BaseLayout, EmptyState, MostLikedCard, Pagination};
use crate::controllers::HomeView;
use crate::query::QueryState;
use crate::session::AuthUser;

/// Render the complete home page.
#[must_use]
pub fn render_home_page(view: &HomeView, user: Option<&AuthUser>) -> Markup {
    let title = if view.controller.is_searching() {
        "Search"
    } else {
        "Home"
    };

    let content = if view.show_empty_state() {
        let back = view.controller.clear_search_href();
        html! {
            (EmptyState::new("No results found", "Try using different keywords")
                .with_action("Back to Home", &back))
        }
    } else {
        html! {
            div class="home-columns" {
                section class="feed" {
                    h1 { (view.heading()) }
                    (render_status(&view.posts, "Failed to load posts."))
                    @if let Some(posts) = view.posts.data() {
                        @for post in &posts.data {
                            (ArticleCard::new(post))
                            hr;
                        }
                    }
                    (Pagination::new(&view.controller, view.last_page()))
                }
                @if let Some(most_liked) = &view.most_liked {
                    (render_most_liked(most_liked))
                }
            }
        }
    };

    BaseLayout::new(title, user)
        .with_feed(&view.controller)
        .render(content)
}

fn render_status(state: &QueryState<PaginatedPosts>, failure: &str) -> Markup {
    html! {
        @if state.is_loading() {
            (Alert::info("Loading articles..."))
        }
        @if state.is_error() {
            (Alert::error(failure))
        }
    }
}

fn render_most_liked(state: &QueryState<PaginatedPosts>) -> Markup {
    html! {
        aside class="most-liked" {
            h2 { "Most Liked" }
            (render_status(state, "Failed to load most liked posts."))
            @if let Some(posts) = state.data() {
                @for (i, post) in posts.data.iter().enumerate() {
                    @if i > 0 {
                        hr;
                    }
                    (MostLikedCard::new(post))
                }
            }
        }
    }
}
