// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod cookie;
pub mod identity;
pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use identity::{can_mutate, Identity, SignedIn, Viewer};
pub use password::{hash_password, hash_password_secure, verify_password};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{InvalidReason, TokenCodec, TokenStatus};
