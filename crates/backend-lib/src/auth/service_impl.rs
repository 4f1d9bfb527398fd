// ===========================================
// crates/backend-lib/src/auth/service_impl.rs
// ===========================================
use async_trait::async_trait;
use blog_common::UserId;

use super::{hash_password, hash_password_secure, verify_password, AuthService, TokenCodec, TokenStatus};
use crate::config::Settings;
use crate::error::AppError;

pub struct DefaultAuth {
    codec: TokenCodec,
    log_n: u8,
    /// Verified against when the username is unknown
    dummy_hash: String,
}

impl DefaultAuth {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let codec = TokenCodec::new(settings.jwt_secret.as_bytes(), settings.session_ttl_secs);
        let dummy_hash = hash_password("correct horse battery staple", settings.password_hash_log_n)?;
        Ok(Self {
            codec,
            log_n: settings.password_hash_log_n,
            dummy_hash,
        })
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn hash_password(&self, mut plain: String) -> Result<String, AppError> {
        let log_n = self.log_n;
        tokio::task::spawn_blocking(move || hash_password_secure(&mut plain, log_n)).await?
    }

    async fn verify_password(&self, hash: Option<String>, plain: String) -> bool {
        let known = hash.is_some();
        let hash = hash.unwrap_or_else(|| self.dummy_hash.clone());
        let matched = tokio::task::spawn_blocking(move || verify_password(&hash, &plain))
            .await
            .unwrap_or(false);
        known && matched
    }

    fn issue_token(&self, user_id: UserId, username: &str) -> Result<String, AppError> {
        Ok(self.codec.issue(user_id, username)?)
    }

    fn decode_token(&self, token: &str) -> TokenStatus {
        self.codec.decode(token)
    }

    fn session_ttl_secs(&self) -> u64 {
        self.codec.ttl_secs()
    }
}
