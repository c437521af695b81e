//! Page navigation for the home feed and search results.
//!
//! Shows Previous, a short window of page numbers and Next. Previous and
//! Next render as disabled spans at the first and last page.

use maud::{html, Markup, Render};

use crate::controllers::home::{next_page, previous_page, FeedController, PageWindow};

#[derive(Debug, Clone)]
pub struct Pagination<'a> {
    controller: &'a FeedController,
    last_page: u32,
}

impl<'a> Pagination<'a> {
    #[must_use]
    pub fn new(controller: &'a FeedController, last_page: u32) -> Self {
        Self {
            controller,
            last_page: last_page.max(1),
        }
    }

    /// Nothing to page through with a single page.
    #[must_use]
    pub fn should_display(&self) -> bool {
        self.last_page > 1
    }
}

impl Render for Pagination<'_> {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        let current = self.controller.current_page();
        let window = PageWindow::for_last_page(self.last_page);

        html! {
            nav class="pagination" aria-label="Pagination" {
                @match previous_page(current) {
                    Some(page) => a href=(self.controller.href_for_page(page)) rel="prev" { "\u{00ab} Previous" },
                    None => span class="disabled" { "\u{00ab} Previous" },
                }

                @for page in &window.pages {
                    @if *page == current {
                        span class="current" aria-current="page" { (page) }
                    } @else {
                        a href=(self.controller.href_for_page(*page)) { (page) }
                    }
                }
                @if window.ellipsis {
                    span class="ellipsis" { "..." }
                }

                @match next_page(current, self.last_page) {
                    Some(page) => a href=(self.controller.href_for_page(page)) rel="next" { "Next \u{00bb}" },
                    None => span class="disabled" { "Next \u{00bb}" },
                }
            }
        }
    }
}
