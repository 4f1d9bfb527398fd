// ============================
// crates/backend-lib/src/handlers/account.rs
// ============================
//! Registration, login, logout and the home page.
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use blog_common::{LoginForm, RegisterForm, User};
use metrics::counter;
use tracing::{info, warn};

use super::{form_or_default, sign_out_and_redirect_home};
use crate::auth::{cookie, Viewer};
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::{Storage, StoreError};
use crate::validation::{self, FormErrors, Registration, INVALID_CREDENTIALS, USERNAME_TAKEN};
use crate::views::{Page, View};
use crate::AppState;

/// `GET /`: dashboard for a signed-in viewer, landing page otherwise
pub async fn home<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    let Some(identity) = viewer.identity() else {
        return Ok(Page::new(View::Homepage, None).into_response());
    };

    let posts = state.storage.list_posts_by_author(identity.user_id).await?;
    Ok(Page::new(View::Dashboard { posts }, Some(identity)).into_response())
}

/// `GET /login`: visiting the form ends any current session
pub async fn login_page(viewer: Viewer) -> Response {
    let page = Page::new(View::Login, None);
    match viewer {
        Viewer::User(_) => (
            [(header::SET_COOKIE, cookie::clear_session_cookie())],
            page,
        )
            .into_response(),
        Viewer::Anonymous => page.into_response(),
    }
}

/// `GET /logout`
pub async fn logout(viewer: Viewer) -> Response {
    if let Some(identity) = viewer.identity() {
        info!(user_id = identity.user_id, "user logged out");
    }
    sign_out_and_redirect_home()
}

/// `POST /register`
pub async fn register<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    viewer: Viewer,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<Response, AppError> {
    let render_errors =
        |errors: FormErrors| Page::new(View::Homepage, viewer.identity()).with_errors(errors).into_response();

    let Registration { username, password } =
        match validation::validate_registration(form_or_default(form)) {
            Ok(registration) => registration,
            Err(errors) => return Ok(render_errors(errors)),
        };

    if state.storage.find_user_by_username(&username).await?.is_some() {
        return Ok(render_errors(FormErrors::single(USERNAME_TAKEN)));
    }

    let password_hash = state.auth.hash_password(password).await?;

    // The pre-check can race with a concurrent registration
    let user = match state.storage.create_user(&username, &password_hash).await {
        Ok(user) => user,
        Err(StoreError::UsernameTaken) => {
            return Ok(render_errors(FormErrors::single(USERNAME_TAKEN)));
        },
        Err(err) => return Err(err.into()),
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    counter!(keys::USER_REGISTERED).increment(1);

    sign_in(&state, &user)
}

/// `POST /login`
pub async fn login<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let render_failure = || {
        counter!(keys::LOGIN_FAILURE).increment(1);
        Page::new(View::Login, None)
            .with_errors(FormErrors::single(INVALID_CREDENTIALS))
            .into_response()
    };

    let credentials = match validation::validate_login(form_or_default(form)) {
        Ok(credentials) => credentials,
        Err(_) => return Ok(render_failure()),
    };

    let user = state
        .storage
        .find_user_by_username(&credentials.username)
        .await?;
    let matched = state
        .auth
        .verify_password(
            user.as_ref().map(|user| user.password_hash.clone()),
            credentials.password,
        )
        .await;

    match user {
        Some(user) if matched => {
            info!(user_id = user.id, "user logged in");
            counter!(keys::LOGIN_SUCCESS).increment(1);
            sign_in(&state, &user)
        },
        _ => {
            warn!(username = %credentials.username, "failed login attempt");
            Ok(render_failure())
        },
    }
}

/// Issue a session token for `user`, set the cookie and go to the dashboard
fn sign_in<S>(state: &AppState<S>, user: &User) -> Result<Response, AppError> {
    let token = state.auth.issue_token(user.id, &user.username)?;
    let session = cookie::session_cookie(&token, state.auth.session_ttl_secs())?;
    Ok(([(header::SET_COOKIE, session)], Redirect::to("/")).into_response())
}
