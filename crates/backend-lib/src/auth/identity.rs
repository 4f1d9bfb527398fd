// ============================
// crates/backend-lib/src/auth/identity.rs
// ============================
//! Per-request identity and the ownership rule.
use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use blog_common::{Post, UserId};
use serde::Serialize;

/// Who a valid session token says the caller is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    /// Unix timestamp after which the token stops being accepted
    pub expires_at: i64,
}

/// The caller of the current request, resolved once by the identity middleware
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(Identity),
}

impl Viewer {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(identity) => Some(identity),
        }
    }

    /// Presentational only; mutating handlers re-check with [`can_mutate`]
    pub fn is_author_of(&self, post: &Post) -> bool {
        self.identity()
            .is_some_and(|identity| identity.user_id == post.author_id)
    }
}

/// The single authorization rule: only a post's author may edit or delete it
pub fn can_mutate(identity: &Identity, post: &Post) -> bool {
    identity.user_id == post.author_id
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Viewer>().cloned().unwrap_or_default())
    }
}

/// Extractor for routes that need a signed-in caller
///
/// Anonymous callers are redirected home before any other extractor runs.
#[derive(Debug, Clone)]
pub struct SignedIn(pub Identity);

impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Viewer::from_request_parts(parts, state).await {
            Ok(Viewer::User(identity)) => Ok(SignedIn(identity)),
            _ => Err(Redirect::to("/")),
        }
    }
}
