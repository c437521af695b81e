//! Article cards for the home feed and the most-liked panel.

use maud::{html, Markup, Render};

use crate::api::{Author, Post};
use crate::text::{excerpt, format_date, strip_html_tags};

/// Characters of body text shown on a card.
const DESCRIPTION_CHARS: usize = 160;

fn detail_href(post: &Post) -> String {
    format!("/detail?id={}", post.id)
}

fn description(post: &Post) -> String {
    excerpt(&strip_html_tags(&post.content), DESCRIPTION_CHARS)
}

/// Author avatar, falling back to the author's initial.
#[derive(Debug, Clone, Copy)]
pub struct Avatar<'a> {
    pub name: &'a str,
    pub url: Option<&'a str>,
}

impl<'a> Avatar<'a> {
    #[must_use]
    pub const fn new(name: &'a str, url: Option<&'a str>) -> Self {
        Self { name, url }
    }

    #[must_use]
    pub fn for_author(author: &'a Author) -> Self {
        Self::new(&author.name, author.avatar_url.as_deref())
    }
}

impl Render for Avatar<'_> {
    fn render(&self) -> Markup {
        match self.url.filter(|u| !u.is_empty()) {
            Some(url) => html! {
                img class="avatar" src=(url) alt=(format!("{} profile", self.name)) loading="lazy";
            },
            None => {
                let initial = self
                    .name
                    .chars()
                    .next()
                    .map_or_else(|| "?".to_string(), |c| c.to_uppercase().to_string());
                html! { span class="avatar avatar-initial" aria-hidden="true" { (initial) } }
            }
        }
    }
}

/// Like and comment counters.
#[derive(Debug, Clone, Copy)]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
}

impl Render for Engagement {
    fn render(&self) -> Markup {
        html! {
            p class="engagement" {
                span class="likes" title="Likes" { "\u{2665} " (self.likes) }
                span class="comments" title="Comments" { "\u{1f4ac} " (self.comments) }
            }
        }
    }
}

/// Tag chips in backend order.
#[derive(Debug, Clone, Copy)]
pub struct TagList<'a>(pub &'a [String]);

impl Render for TagList<'_> {
    fn render(&self) -> Markup {
        html! {
            @if !self.0.is_empty() {
                ul class="tags" {
                    @for tag in self.0 {
                        li class="tag" { (tag) }
                    }
                }
            }
        }
    }
}

/// A feed entry linking to the article's detail page.
#[derive(Debug, Clone, Copy)]
pub struct ArticleCard<'a> {
    pub post: &'a Post,
}

impl<'a> ArticleCard<'a> {
    #[must_use]
    pub const fn new(post: &'a Post) -> Self {
        Self { post }
    }
}

impl Render for ArticleCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        let author_name = if post.author.name.is_empty() {
            "Unknown Author"
        } else {
            post.author.name.as_str()
        };

        html! {
            article class="article-card" {
                a href=(detail_href(post)) {
                    @if let Some(image) = post.image() {
                        img class="article-image" src=(image) alt=(post.title) loading="lazy";
                    }
                    div class="article-body" {
                        h3 { (post.title) }
                        (TagList(&post.tags))
                        p class="description" { (description(post)) }
                        p class="byline" {
                            (Avatar::new(author_name, post.author.avatar_url.as_deref()))
                            span class="author" { (author_name) }
                            span class="dot" aria-hidden="true" { "\u{00b7}" }
                            time datetime=(post.created_at) { (format_date(&post.created_at)) }
                        }
                        (Engagement { likes: post.likes, comments: post.comments })
                    }
                }
            }
        }
    }
}

/// Compact entry for the most-liked panel: title, description, counters.
#[derive(Debug, Clone, Copy)]
pub struct MostLikedCard<'a> {
    pub post: &'a Post,
}

impl<'a> MostLikedCard<'a> {
    #[must_use]
    pub const fn new(post: &'a Post) -> Self {
        Self { post }
    }
}

impl Render for MostLikedCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        html! {
            article class="most-liked-card" {
                a href=(detail_href(post)) {
                    h4 { (post.title) }
                    p class="description" { (description(post)) }
                    (Engagement { likes: post.likes, comments: post.comments })
                }
            }
        }
    }
}

/// Shown instead of the list when a search finds nothing.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub action: Option<(&'a str, &'a str)>,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            action: None,
        }
    }

    /// Add a link button below the message.
    #[must_use]
    pub const fn with_action(mut self, label: &'a str, href: &'a str) -> Self {
        self.action = Some((label, href));
        self
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            section class="empty-state" {
                h2 { (self.title) }
                p { (self.message) }
                @if let Some((label, href)) = self.action {
                    a class="button" href=(href) { (label) }
                }
            }
        }
    }
}
