// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{account, posts};
use crate::middleware::resolve_identity;
use crate::storage::Storage;
use crate::AppState;

/// Create the application router
///
/// Every route runs behind [`resolve_identity`], so handlers can always
/// extract a [`Viewer`](crate::auth::Viewer).
pub fn create_router<S: Storage + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(account::home::<S>))
        .route("/login", get(account::login_page).post(account::login::<S>))
        .route("/logout", get(account::logout))
        .route("/register", post(account::register::<S>))
        .route(
            "/create-post",
            get(posts::create_post_page).post(posts::create_post::<S>),
        )
        .route(
            "/edit-post/{id}",
            get(posts::edit_post_page::<S>).post(posts::edit_post::<S>),
        )
        .route("/delete-post/{id}", post(posts::delete_post::<S>))
        .route("/post/{id}", get(posts::single_post::<S>))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            resolve_identity::<S>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn health() -> &'static str {
    "ok"
}
