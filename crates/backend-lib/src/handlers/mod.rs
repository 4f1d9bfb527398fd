// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.
//!
//! Every handler ends in a rendered [`Page`](crate::views::Page) or a
//! redirect; only storage and crypto failures surface as [`AppError`](crate::error::AppError).

pub mod account;
pub mod posts;

use axum::extract::{rejection::FormRejection, Form};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::cookie;

/// Treat an unreadable form body as a form with every field empty
pub(crate) fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable form body, using empty fields");
            T::default()
        },
    }
}

pub(crate) fn redirect_home() -> Response {
    Redirect::to("/").into_response()
}

/// Redirect home and drop the session cookie
pub(crate) fn sign_out_and_redirect_home() -> Response {
    (
        [(header::SET_COOKIE, cookie::clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
