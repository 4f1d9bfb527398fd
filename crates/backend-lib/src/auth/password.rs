// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

use crate::error::AppError;

/// scrypt block size
const SCRYPT_R: u32 = 8;
/// scrypt parallelism
const SCRYPT_P: u32 = 1;
/// Derived key length in bytes
const SCRYPT_LEN: usize = 32;

/// Hash a password using scrypt with cost `2^log_n`
pub fn hash_password(plain: &str, log_n: u8) -> Result<String, AppError> {
    let params = Params::new(log_n, SCRYPT_R, SCRYPT_P, SCRYPT_LEN)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
///
/// A malformed hash counts as a mismatch.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String, log_n: u8) -> Result<String, AppError> {
    let hash = hash_password(plain, log_n);
    plain.zeroize();
    hash
}
