// ======================================
// crates/backend-lib/src/auth/service.rs
// ======================================
use async_trait::async_trait;
use blog_common::UserId;

use super::TokenStatus;
use crate::error::AppError;

/// Everything handlers need to prove and check identity
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hash a new password; the plaintext is zeroized afterwards
    async fn hash_password(&self, plain: String) -> Result<String, AppError>;

    /// Check `plain` against `hash`; `None` (unknown user) still costs one verification
    async fn verify_password(&self, hash: Option<String>, plain: String) -> bool;

    fn issue_token(&self, user_id: UserId, username: &str) -> Result<String, AppError>;

    fn decode_token(&self, token: &str) -> TokenStatus;

    /// Token lifetime, which is also the session cookie's max-age
    fn session_ttl_secs(&self) -> u64;
}
