// ========================================
// crates/backend-lib/src/middleware/mod.rs
// ========================================
//! Middleware for the blog server.

pub mod identity;

pub use identity::resolve_identity;
