// ============================
// crates/backend-lib/src/metrics.rs
// ============================
//! Central place for metric keys
pub const USER_REGISTERED: &str = "auth.register";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const TOKEN_REJECTED: &str = "auth.token.rejected";
pub const POST_CREATED: &str = "post.created";
pub const POST_UPDATED: &str = "post.updated";
pub const POST_DELETED: &str = "post.deleted";
