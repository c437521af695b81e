//! Base page layout: HTML skeleton, header with search and auth links,
//! and footer.

use maud::{html, Markup, Render, DOCTYPE};

use super::form::{Form, Input};
use crate::controllers::FeedController;
use crate::session::AuthUser;

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", session.user()).render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    user: Option<&'a AuthUser>,
    feed: Option<&'a FeedController>,
}

impl<'a> BaseLayout<'a> {
    /// Pass `None` for anonymous visitors.
    #[must_use]
    pub fn new(title: &'a str, user: Option<&'a AuthUser>) -> Self {
        Self {
            title,
            user,
            feed: None,
        }
    }

    /// Tie the header search box and logo link to the home feed state, so
    /// searching or clearing keeps the reader's feed page.
    #[must_use]
    pub fn with_feed(mut self, feed: &'a FeedController) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Render the complete HTML page with `content` inside `<main>`.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - Inkwell" }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        let logo_href = self
            .feed
            .map_or_else(|| "/".to_string(), FeedController::clear_search_href);

        html! {
            header class="container site-header" {
                nav {
                    a class="site-logo" href=(logo_href) { strong { "Inkwell" } }
                    (self.render_search())
                    ul class="auth-nav" {
                        (self.render_auth_nav())
                    }
                }
            }
        }
    }

    /// Search submits the typed text as the committed query; the feed page
    /// travels along so leaving the search restores it.
    fn render_search(&self) -> Markup {
        let input = self.feed.map_or("", FeedController::input);
        let feed_page = self
            .feed
            .map(|f| f.recommended_page())
            .filter(|page| *page > 1)
            .map(|page| page.to_string());

        let fields = html! {
            (Input::search("q").value(input).placeholder("Search").autocomplete("off"))
            @if let Some(page) = &feed_page {
                (Input::hidden("feed", page))
            }
        };
        Form::get("/", fields).class("search").render()
    }

    fn render_auth_nav(&self) -> Markup {
        match self.user {
            Some(user) => html! {
                li class="user-name" { (user.display_name()) }
                li {
                    form action="/logout" method="post" class="inline" {
                        button type="submit" class="link" { "Logout" }
                    }
                }
            },
            None => html! {
                li { a href="/login" { "Login" } }
                li { a class="button" href="/register" { "Register" } }
            },
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { "\u{00a9} 2025 Inkwell. All rights reserved." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::HomeParams;
    use crate::session::DisplayProfile;

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Test Page", None).render(content).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Page - Inkwell</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/css/style.css">"#));
        assert!(html.contains(r#"<main class="container"><h1>Test Content</h1></main>"#));
        assert!(html.contains("All rights reserved."));
    }

    #[test]
    fn test_anonymous_nav() {
        let html = BaseLayout::new("Anon", None).render(html! {}).into_string();
        assert!(html.contains(r#"<a href="/login">Login</a>"#));
        assert!(html.contains(r#"href="/register""#));
        assert!(!html.contains("/logout"));
    }

    #[test]
    fn test_authenticated_nav() {
        let user = AuthUser::new("ana@x.com", "tok", DisplayProfile::named("Ana"));
        let html = BaseLayout::new("User", Some(&user)).render(html! {}).into_string();
        assert!(html.contains(r#"<li class="user-name">Ana</li>"#));
        assert!(html.contains(r#"action="/logout""#));
        assert!(!html.contains(r#"href="/login""#));
    }

    #[test]
    fn test_search_keeps_feed_page() {
        let feed = FeedController::from_params(&HomeParams {
            q: Some("rust".to_string()),
            page: Some(2),
            feed: Some(3),
        });
        let html = BaseLayout::new("Home", None)
            .with_feed(&feed)
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"value="rust""#));
        assert!(html.contains(r#"name="feed" value="3""#));
        assert!(html.contains(r#"class="site-logo" href="/?feed=3""#));
    }

    #[test]
    fn test_logo_defaults_home() {
        let html = BaseLayout::new("Detail", None).render(html! {}).into_string();
        assert!(html.contains(r#"class="site-logo" href="/""#));
        assert!(!html.contains(r#"name="feed""#));
    }
}
