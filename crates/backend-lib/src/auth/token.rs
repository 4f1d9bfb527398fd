// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed session tokens.
//!
//! A token is an HS256 JWT carrying `{userid, username, exp}`. Nothing is
//! stored server side; a token is trusted iff its signature and expiry check out.
use blog_common::UserId;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::identity::Identity;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    userid: UserId,
    username: String,
    exp: i64,
}

/// Why a token was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// `exp` is in the past
    Expired,
    /// Signed with a different key or tampered with
    BadSignature,
    /// Not a JWT, wrong algorithm, or missing claims
    Malformed,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::Expired => "expired",
            InvalidReason::BadSignature => "bad_signature",
            InvalidReason::Malformed => "malformed",
        }
    }
}

/// Outcome of decoding a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(Identity),
    Invalid(InvalidReason),
}

/// Issues and checks session tokens with one process-wide key
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenCodec {
    /// Create a codec signing with `secret`; issued tokens live `ttl_secs`
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Lifetime of issued tokens, also used as the cookie max-age
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for `user_id` expiring after the configured TTL
    pub fn issue(
        &self,
        user_id: UserId,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        self.issue_with_ttl(user_id, username, ttl)
    }

    /// Issue a token expiring `ttl_secs` from now; a negative TTL yields an expired token
    pub fn issue_with_ttl(
        &self,
        user_id: UserId,
        username: &str,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            userid: user_id,
            username: username.to_string(),
            exp: Utc::now().timestamp().saturating_add(ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Decode a token; any failure is reported as [`TokenStatus::Invalid`]
    pub fn decode(&self, token: &str) -> TokenStatus {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => TokenStatus::Valid(Identity {
                user_id: data.claims.userid,
                username: data.claims.username,
                expires_at: data.claims.exp,
            }),
            Err(err) => TokenStatus::Invalid(match err.kind() {
                ErrorKind::ExpiredSignature => InvalidReason::Expired,
                ErrorKind::InvalidSignature => InvalidReason::BadSignature,
                _ => InvalidReason::Malformed,
            }),
        }
    }
}
