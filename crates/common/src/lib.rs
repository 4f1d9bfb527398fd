// ================
// common/src/lib.rs
// ================
//! Common types shared by the blog backend and its tests.
//! This module defines the persisted records and the inbound form payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a row in the `users` table
pub type UserId = i64;

/// Identifier of a row in the `posts` table
pub type PostId = i64;

/// A registered account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Row id
    pub id: UserId,
    /// Unique, alphanumeric login name
    pub username: String,
    /// Salted scrypt hash in PHC string format
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// A blog post owned by exactly one user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Row id
    pub id: PostId,
    /// Creation time, never changed by edits
    pub created_at: DateTime<Utc>,
    /// Plain-text title
    pub title: String,
    /// Plain-text body
    pub body: String,
    /// Author reference (`users.id`), immutable after creation
    pub author_id: UserId,
}

/// A post joined with its author's username, as shown on the single-post page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    /// The post itself
    #[serde(flatten)]
    pub post: Post,
    /// `users.username` of `post.author_id`
    pub author_username: String,
}

/// Title and body of a post that is about to be written
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
}

/// Body of `POST /register`
///
/// Missing fields deserialize as empty strings.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /create-post` and `POST /edit-post/{id}`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}
