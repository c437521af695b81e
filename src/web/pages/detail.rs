//! Article detail page with comments.

use maud::{html, Markup};

use crate::components::card::{Avatar, Engagement, TagList};
use crate::components::{Alert, BaseLayout, CommentComposer, CommentList, MostLikedCard};
use crate::controllers::{CommentLimit, DetailView};
use crate::session::AuthUser;
use crate::text::{format_date, strip_html_tags};

/// Render the complete detail page.
#[must_use]
pub fn render_detail_page(view: &DetailView, user: Option<&AuthUser>) -> Markup {
    let title = view
        .post
        .data()
        .map_or("Article", |post| post.title.as_str());

    let content = if view.controller.post_id().is_none() {
        html! {
            section class="not-found" {
                h1 { "Post not found" }
                p { "This article does not exist or the link is incomplete." }
                a class="button" href="/" { "Back to Home" }
            }
        }
    } else {
        html! {
            (render_article(view))
            @if view.post.data().is_some() {
                (render_comments(view, user))
                (render_next_post(view))
            }
        }
    };

    BaseLayout::new(title, user).render(content)
}

fn render_article(view: &DetailView) -> Markup {
    html! {
        @if view.post.is_loading() {
            (Alert::info("Loading article..."))
        }
        @if view.post.is_error() {
            (Alert::error("Failed to load article."))
        }
        @if let Some(post) = view.post.data() {
            article class="post" {
                header {
                    h1 { (post.title) }
                    (TagList(&post.tags))
                    p class="byline" {
                        (Avatar::for_author(&post.author))
                        span class="author" { (post.author.name) }
                        @if let Some(headline) = &post.author.headline {
                            span class="headline" { (headline) }
                        }
                        time datetime=(post.created_at) { (format_date(&post.created_at)) }
                    }
                    (Engagement { likes: post.likes, comments: post.comments })
                }
                @if let Some(image) = post.image() {
                    img class="post-image" src=(image) alt=(post.title);
                }
                div class="post-content" {
                    p { (strip_html_tags(&post.content)) }
                }
            }
        }
    }
}

fn render_comments(view: &DetailView, user: Option<&AuthUser>) -> Markup {
    let comments = view.comment_list();
    let identity = view.composer_identity();
    let inline = view.controller.inline_limit();

    html! {
        section class="comments" id="comments" {
            h2 { "Comments(" (comments.len()) ")" }
            (CommentComposer {
                identity: identity.as_ref(),
                email: user.map(|u| u.email.as_str()),
            })
            @if view.comments.is_error() {
                (Alert::error("Failed to load comments."))
            }
            (CommentList::new(comments, inline))
            @if inline.truncates(comments.len()) {
                a class="see-all" href=(view.controller.all_comments_href()) { "See All Comments" }
            }
        }
        @if view.controller.is_dialog_open() {
            dialog class="comments-dialog" open {
                header {
                    h2 { "Comments(" (comments.len()) ")" }
                    a class="close" href=(format!("{}#comments", view.controller.href())) aria-label="Close" { "\u{00d7}" }
                }
                (CommentList::new(comments, CommentLimit::All))
            }
        }
    }
}

fn render_next_post(view: &DetailView) -> Markup {
    html! {
        @if let Some(next) = view.next_post.data() {
            section class="next-post" {
                h2 { "Another Post" }
                (MostLikedCard::new(next))
            }
        }
    }
}
