// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality for the blog server: accounts, stateless sessions
//! and author-owned posts over SQLite.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;
pub mod views;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::{SqliteStorage, Storage};

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings the process was started with
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
}

impl<S: Storage> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> Result<Self, AppError> {
        let auth = Arc::new(DefaultAuth::new(&settings)?);
        Ok(Self {
            auth,
            settings: Arc::new(settings),
            storage,
        })
    }
}

impl AppState<SqliteStorage> {
    /// Open the configured database and build the state around it
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let storage = SqliteStorage::open(&settings.database_path)?;
        Self::new(storage, settings)
    }
}
