// ============================
// crates/backend-lib/src/handlers/posts.rs
// ============================
//! Post creation, viewing, editing and deletion.
//!
//! Edit and delete look the post up and check ownership on every request.
//! A missing post and someone else's post produce the same redirect home.
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Form, Path, State,
    },
    response::{IntoResponse, Redirect, Response},
};
use blog_common::{Post, PostForm, PostId};
use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};

use super::{form_or_default, redirect_home, sign_out_and_redirect_home};
use crate::auth::{can_mutate, Identity, SignedIn, Viewer};
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::{Storage, StoreError};
use crate::validation::{self, InvalidPost};
use crate::views::{Page, View};
use crate::AppState;

/// `GET /create-post`
pub async fn create_post_page(SignedIn(identity): SignedIn) -> Response {
    let view = View::CreatePost {
        title: String::new(),
        body: String::new(),
    };
    Page::new(view, Some(&identity)).into_response()
}

/// `POST /create-post`
pub async fn create_post<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    SignedIn(identity): SignedIn,
    form: Result<Form<PostForm>, FormRejection>,
) -> Result<Response, AppError> {
    let draft = match validation::validate_post(form_or_default(form)) {
        Ok(draft) => draft,
        Err(InvalidPost { draft, errors }) => {
            let view = View::CreatePost {
                title: draft.title,
                body: draft.body,
            };
            return Ok(Page::new(view, Some(&identity))
                .with_errors(errors)
                .into_response());
        },
    };

    let post = match state
        .storage
        .create_post(identity.user_id, &draft, Utc::now())
        .await
    {
        Ok(post) => post,
        Err(StoreError::UnknownAuthor) => {
            // Validly signed token for a user the store no longer has
            warn!(user_id = identity.user_id, "session refers to a missing user");
            return Ok(sign_out_and_redirect_home());
        },
        Err(err) => return Err(err.into()),
    };

    info!(user_id = identity.user_id, post_id = post.id, "post created");
    counter!(keys::POST_CREATED).increment(1);

    Ok(Redirect::to(&post_url(post.id)).into_response())
}

/// `GET /post/{id}`: public
pub async fn single_post<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    viewer: Viewer,
    id: Result<Path<PostId>, PathRejection>,
) -> Result<Response, AppError> {
    let Some(id) = post_id(id) else {
        return Ok(redirect_home());
    };
    let Some(post) = state.storage.find_post_with_author(id).await? else {
        return Ok(redirect_home());
    };

    let is_author = viewer.is_author_of(&post.post);
    Ok(Page::new(View::SinglePost { post, is_author }, viewer.identity()).into_response())
}

/// `GET /edit-post/{id}`
pub async fn edit_post_page<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    SignedIn(identity): SignedIn,
    id: Result<Path<PostId>, PathRejection>,
) -> Result<Response, AppError> {
    let Some(post) = load_owned_post(&state, &identity, post_id(id)).await? else {
        return Ok(redirect_home());
    };
    Ok(Page::new(View::EditPost { post }, Some(&identity)).into_response())
}

/// `POST /edit-post/{id}`
pub async fn edit_post<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    SignedIn(identity): SignedIn,
    id: Result<Path<PostId>, PathRejection>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(post) = load_owned_post(&state, &identity, post_id(id)).await? else {
        return Ok(redirect_home());
    };

    let draft = match validation::validate_post(form_or_default(form)) {
        Ok(draft) => draft,
        Err(InvalidPost { draft, errors }) => {
            let post = Post {
                title: draft.title,
                body: draft.body,
                ..post
            };
            return Ok(Page::new(View::EditPost { post }, Some(&identity))
                .with_errors(errors)
                .into_response());
        },
    };

    state.storage.update_post(post.id, &draft).await?;

    info!(user_id = identity.user_id, post_id = post.id, "post updated");
    counter!(keys::POST_UPDATED).increment(1);

    Ok(Redirect::to(&post_url(post.id)).into_response())
}

/// `POST /delete-post/{id}`
pub async fn delete_post<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    SignedIn(identity): SignedIn,
    id: Result<Path<PostId>, PathRejection>,
) -> Result<Response, AppError> {
    let Some(post) = load_owned_post(&state, &identity, post_id(id)).await? else {
        return Ok(redirect_home());
    };

    state.storage.delete_post(post.id).await?;

    info!(user_id = identity.user_id, post_id = post.id, "post deleted");
    counter!(keys::POST_DELETED).increment(1);

    Ok(redirect_home())
}

/// The post with `id` if it exists and `identity` may mutate it
async fn load_owned_post<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    id: Option<PostId>,
) -> Result<Option<Post>, AppError> {
    let Some(id) = id else {
        return Ok(None);
    };
    let post = state.storage.find_post(id).await?;
    Ok(post.filter(|post| can_mutate(identity, post)))
}

fn post_id(id: Result<Path<PostId>, PathRejection>) -> Option<PostId> {
    id.ok().map(|Path(id)| id)
}

/// Canonical URL of a post
pub fn post_url(id: PostId) -> String {
    format!("/post/{id}")
}
