// ============================
// tests/unit/password_tests.rs
// ============================
use backend_lib::auth::{hash_password, hash_password_secure, verify_password};

// Cheap parameters keep the suite fast; production uses the configured cost
const LOG_N: u8 = 4;

#[test]
fn test_password_hashing_and_verification() {
    let password = "hunter22";
    let hash = hash_password(password, LOG_N).unwrap();

    assert_ne!(password, hash);
    assert!(hash.starts_with("$scrypt$"));
    assert!(verify_password(&hash, password));
    assert!(!verify_password(&hash, "hunter23"));
}

#[test]
fn test_same_password_hashes_differently() {
    let first = hash_password("hunter22", LOG_N).unwrap();
    let second = hash_password("hunter22", LOG_N).unwrap();

    // Fresh salt per hash
    assert_ne!(first, second);
    assert!(verify_password(&first, "hunter22"));
    assert!(verify_password(&second, "hunter22"));
}

#[test]
fn test_malformed_hash_never_verifies() {
    assert!(!verify_password("", "hunter22"));
    assert!(!verify_password("not-a-phc-string", "hunter22"));
}

#[test]
fn test_secure_hashing_clears_input() {
    let mut password = "hunter22".to_string();
    let hash = hash_password_secure(&mut password, LOG_N).unwrap();

    assert!(password.is_empty());
    assert!(verify_password(&hash, "hunter22"));
}
