//! Article detail page state.

use serde::Deserialize;

use crate::api::{Comment, Post, UserProfile};
use crate::query::{Hooks, QueryState};
use crate::session::{AuthUser, DisplayProfile};

/// Comments shown inline before the "see all" dialog.
pub const INLINE_COMMENT_COUNT: usize = 3;

/// How many comments a comment list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentLimit {
    First(usize),
    All,
}

impl CommentLimit {
    #[must_use]
    pub fn apply(self, comments: &[Comment]) -> &[Comment] {
        match self {
            Self::First(n) => &comments[..n.min(comments.len())],
            Self::All => comments,
        }
    }

    /// Whether `total` comments would be cut off by this limit.
    #[must_use]
    pub fn truncates(self, total: usize) -> bool {
        matches!(self, Self::First(n) if total > n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DetailParams {
    pub id: Option<String>,
    /// `all` opens the full comment list
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailController {
    post_id: Option<u64>,
    show_all_comments: bool,
}

impl DetailController {
    /// Resolve the post id; anything that is not a number counts as absent.
    #[must_use]
    pub fn from_params(params: &DetailParams) -> Self {
        Self {
            post_id: params.id.as_deref().and_then(|id| id.trim().parse().ok()),
            show_all_comments: params.comments.as_deref() == Some("all"),
        }
    }

    #[must_use]
    pub fn post_id(&self) -> Option<u64> {
        self.post_id
    }

    /// The "next article" shown below the post: simply the following id.
    #[must_use]
    pub fn next_post_id(&self) -> Option<u64> {
        self.post_id.and_then(|id| id.checked_add(1))
    }

    #[must_use]
    pub fn is_dialog_open(&self) -> bool {
        self.show_all_comments
    }

    #[must_use]
    pub fn inline_limit(&self) -> CommentLimit {
        CommentLimit::First(INLINE_COMMENT_COUNT)
    }

    #[must_use]
    pub fn href(&self) -> String {
        self.post_id
            .map_or_else(|| "/detail".to_string(), |id| format!("/detail?id={id}"))
    }

    #[must_use]
    pub fn all_comments_href(&self) -> String {
        self.post_id.map_or_else(
            || "/detail".to_string(),
            |id| format!("/detail?id={id}&comments=all"),
        )
    }

    /// Fetch the post, its comments, the viewer and the next post.
    ///
    /// Without a post id every query stays idle. The current user is only
    /// requested when the session has a token. The next post gets a single
    /// attempt.
    pub async fn load(&self, hooks: &Hooks, session_user: Option<&AuthUser>) -> DetailView {
        let post_observer = hooks.observer::<Post>();
        let comments_observer = hooks.observer::<Vec<Comment>>();
        let me_observer = hooks.current_user_observer();
        let next_observer = hooks.best_effort_observer::<Post>();

        let token = session_user.map(|u| u.token.as_str());
        let (post, comments, me, next_post) = tokio::join!(
            hooks.post_detail(&post_observer, self.post_id),
            hooks.post_comments(&comments_observer, self.post_id),
            hooks.current_user(&me_observer, token),
            hooks.post_detail(&next_observer, self.next_post_id()),
        );

        DetailView {
            controller: *self,
            post,
            comments,
            me,
            next_post,
            session_profile: session_user.map(AuthUser::profile),
        }
    }
}

/// Everything the detail page renders.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub controller: DetailController,
    pub post: QueryState<Post>,
    pub comments: QueryState<Vec<Comment>>,
    pub me: QueryState<UserProfile>,
    pub next_post: QueryState<Post>,
    session_profile: Option<DisplayProfile>,
}

impl DetailView {
    #[must_use]
    pub fn comment_list(&self) -> &[Comment] {
        match self.comments.data() {
            Some(comments) => comments,
            None => &[],
        }
    }

    /// Identity shown on the comment composer: backend fields over the
    /// locally cached ones. `None` for anonymous visitors.
    #[must_use]
    pub fn composer_identity(&self) -> Option<DisplayProfile> {
        let cached = self.session_profile.as_ref()?;
        Some(match self.me.data() {
            Some(user) => DisplayProfile::merge(&DisplayProfile::from(user), cached),
            None => cached.clone(),
        })
    }
}
