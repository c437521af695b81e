//! Comment list and the (read-only) comment composer.

use maud::{html, Markup, Render};

use super::card::Avatar;
use super::form::TextArea;
use crate::api::Comment;
use crate::controllers::CommentLimit;
use crate::session::DisplayProfile;
use crate::text::format_date;

/// One list for both the inline preview and the full dialog.
#[derive(Debug, Clone, Copy)]
pub struct CommentList<'a> {
    pub comments: &'a [Comment],
    pub limit: CommentLimit,
}

impl<'a> CommentList<'a> {
    #[must_use]
    pub const fn new(comments: &'a [Comment], limit: CommentLimit) -> Self {
        Self { comments, limit }
    }
}

impl Render for CommentList<'_> {
    fn render(&self) -> Markup {
        let shown = self.limit.apply(self.comments);
        html! {
            @if shown.is_empty() {
                p class="muted" { "No comments yet." }
            } @else {
                ol class="comment-list" {
                    @for comment in shown {
                        li class="comment" {
                            div class="byline" {
                                (Avatar::for_author(&comment.author))
                                span class="author" { (comment.author.name) }
                                time datetime=(comment.created_at) { (format_date(&comment.created_at)) }
                            }
                            p { (comment.content) }
                        }
                    }
                }
            }
        }
    }
}

/// Composer shown above the comments. Posting comments is not available,
/// so the field is always disabled.
#[derive(Debug, Clone)]
pub struct CommentComposer<'a> {
    pub identity: Option<&'a DisplayProfile>,
    pub email: Option<&'a str>,
}

impl Render for CommentComposer<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="comment-composer" {
                @match self.identity {
                    Some(profile) => {
                        @let name = profile
                            .name
                            .as_deref()
                            .or(profile.username.as_deref())
                            .or(self.email)
                            .unwrap_or("You");
                        p class="byline" {
                            (Avatar::new(name, profile.avatar_url.as_deref()))
                            span class="author" { (name) }
                        }
                    }
                    None => {
                        p class="muted" {
                            a href="/login" { "Log in" } " to join the conversation."
                        }
                    }
                }
                label for="comment" { "Give your Comments" }
                (TextArea::new("comment").placeholder("Enter your comment").rows(3).disabled())
                p class="notice" { "Commenting is not available yet." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Author;

    fn comment(id: u64) -> Comment {
        Comment {
            id,
            content: format!("comment {id}"),
            created_at: "2025-03-27".to_string(),
            author: Author {
                id,
                name: format!("Reader {id}"),
                username: format!("reader{id}"),
                headline: None,
                avatar_url: None,
                email: None,
            },
        }
    }

    #[test]
    fn test_inline_limit() {
        let comments: Vec<Comment> = (1..=5).map(comment).collect();
        let html = CommentList::new(&comments, CommentLimit::First(3))
            .render()
            .into_string();
        assert_eq!(html.matches(r#"<li class="comment">"#).count(), 3);
        assert!(html.contains("comment 3"));
        assert!(!html.contains("comment 4"));
        assert!(html.contains("27 Mar 2025"));
    }

    #[test]
    fn test_all_comments() {
        let comments: Vec<Comment> = (1..=5).map(comment).collect();
        let html = CommentList::new(&comments, CommentLimit::All).render().into_string();
        assert_eq!(html.matches(r#"<li class="comment">"#).count(), 5);
    }

    #[test]
    fn test_no_comments() {
        let html = CommentList::new(&[], CommentLimit::All).render().into_string();
        assert!(html.contains("No comments yet."));
    }

    #[test]
    fn test_composer_is_disabled() {
        let profile = DisplayProfile::named("Ana");
        let html = CommentComposer {
            identity: Some(&profile),
            email: Some("ana@x.com"),
        }
        .render()
        .into_string();
        assert!(html.contains(r#"<span class="author">Ana</span>"#));
        assert!(html.contains("disabled"));

        let anon = CommentComposer {
            identity: None,
            email: None,
        }
        .render()
        .into_string();
        assert!(anon.contains(r#"href="/login""#));
    }
}
