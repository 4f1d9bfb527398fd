// ============================
// crates/backend-lib/src/middleware/identity.rs
// ============================
//! Resolves the session cookie into a [`Viewer`] for every request.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use metrics::counter;

use crate::auth::{cookie, TokenStatus, Viewer};
use crate::metrics as keys;
use crate::storage::Storage;
use crate::AppState;

/// Attach the caller's [`Viewer`] to the request extensions
///
/// Never rejects: a missing, malformed, forged or expired token downgrades
/// the request to [`Viewer::Anonymous`].
pub async fn resolve_identity<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = match cookie::read_session_cookie(request.headers()) {
        None => Viewer::Anonymous,
        Some(token) => match state.auth.decode_token(token) {
            TokenStatus::Valid(identity) => Viewer::User(identity),
            TokenStatus::Invalid(reason) => {
                tracing::debug!(reason = reason.as_str(), "rejected session token");
                counter!(keys::TOKEN_REJECTED, "reason" => reason.as_str()).increment(1);
                Viewer::Anonymous
            },
        },
    };

    request.extensions_mut().insert(viewer);
    next.run(request).await
}
