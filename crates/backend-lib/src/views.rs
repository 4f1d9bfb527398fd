// ============================
// crates/backend-lib/src/views.rs
// ============================
//! Page models for every rendered surface.
//!
//! Markup is produced elsewhere; the server answers with the data a
//! template needs, serialized as JSON.
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use blog_common::{Post, PostWithAuthor};
use serde::Serialize;

use crate::auth::Identity;
use crate::validation::FormErrors;

/// Which surface to render, with its data
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum View {
    /// Landing page with the registration form
    Homepage,
    /// The signed-in user's own posts
    Dashboard { posts: Vec<Post> },
    Login,
    CreatePost { title: String, body: String },
    EditPost { post: Post },
    SinglePost {
        post: PostWithAuthor,
        /// Whether edit/delete controls are shown
        is_author: bool,
    },
}

/// A rendered page: the view plus the viewer and any form errors
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    #[serde(flatten)]
    pub view: View,
    pub user: Option<Identity>,
    pub errors: FormErrors,
}

impl Page {
    pub fn new(view: View, user: Option<&Identity>) -> Self {
        Self {
            view,
            user: user.cloned(),
            errors: FormErrors::new(),
        }
    }

    pub fn with_errors(mut self, errors: FormErrors) -> Self {
        self.errors = errors;
        self
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
