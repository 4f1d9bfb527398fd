// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with a SQLite implementation.
//!
//! Tables:
//! - `users`: id, username (unique), password_hash
//! - `posts`: id, created_at, title, body, author_id -> users.id
//!
//! Every trait method is a single SQL statement; SQLite's per-statement
//! atomicity is the only concurrency control.
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use blog_common::{Post, PostDraft, PostId, PostWithAuthor, User, UserId};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        author_id INTEGER NOT NULL REFERENCES users (id)
    );
    CREATE INDEX IF NOT EXISTS idx_posts_author ON posts (author_id);
";

const POST_COLUMNS: &str = "posts.id, posts.created_at, posts.title, posts.body, posts.author_id";

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username is already taken")]
    UsernameTaken,

    #[error("author does not exist")]
    UnknownAuthor,

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a user; fails with [`StoreError::UsernameTaken`] on a duplicate name
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    /// Look up a user by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a post; fails with [`StoreError::UnknownAuthor`] if `author_id` has no user row
    async fn create_post(
        &self,
        author_id: UserId,
        draft: &PostDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Post, StoreError>;

    /// Look up a post by id
    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    /// Look up a post joined with its author's username
    async fn find_post_with_author(&self, id: PostId)
        -> Result<Option<PostWithAuthor>, StoreError>;

    /// All posts by one author, newest first
    async fn list_posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>, StoreError>;

    /// Replace title and body; returns whether a row was changed
    async fn update_post(&self, id: PostId, draft: &PostDraft) -> Result<bool, StoreError>;

    /// Remove a post; returns whether a row was removed
    async fn delete_post(&self, id: PostId) -> Result<bool, StoreError>;
}

/// SQLite implementation of the Storage trait
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the database at `path` and bootstrap the schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    /// Idempotent; safe to run on every boot
    fn bootstrap(mut conn: Connection) -> Result<Self, StoreError> {
        // Foreign keys are off by default in SQLite
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;

        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await?
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let username = username.to_string();
        let password_hash = password_hash.to_string();
        self.with_conn(move |conn| {
            let result = conn.query_row(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2) RETURNING id",
                params![username, password_hash],
                |row| row.get::<_, UserId>(0),
            );
            match result {
                Ok(id) => Ok(User {
                    id,
                    username,
                    password_hash,
                }),
                Err(err) if is_constraint(&err, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    Err(StoreError::UsernameTaken)
                },
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let user = conn
                .query_row(
                    "SELECT id, username, password_hash FROM users WHERE username = ?1",
                    params![username],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    async fn create_post(
        &self,
        author_id: UserId,
        draft: &PostDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Post, StoreError> {
        let draft = draft.clone();
        // Stored with millisecond precision
        let created_at = created_at.trunc_subsecs(3);
        self.with_conn(move |conn| {
            let result = conn.query_row(
                "INSERT INTO posts (created_at, title, body, author_id)
                 VALUES (?1, ?2, ?3, ?4) RETURNING id",
                params![format_timestamp(&created_at), draft.title, draft.body, author_id],
                |row| row.get::<_, PostId>(0),
            );
            match result {
                Ok(id) => Ok(Post {
                    id,
                    created_at,
                    title: draft.title,
                    body: draft.body,
                    author_id,
                }),
                Err(err) if is_constraint(&err, rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    Err(StoreError::UnknownAuthor)
                },
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        self.with_conn(move |conn| {
            let post = conn
                .query_row(
                    &format!("SELECT {POST_COLUMNS} FROM posts WHERE posts.id = ?1"),
                    params![id],
                    post_from_row,
                )
                .optional()?;
            Ok(post)
        })
        .await
    }

    async fn find_post_with_author(
        &self,
        id: PostId,
    ) -> Result<Option<PostWithAuthor>, StoreError> {
        self.with_conn(move |conn| {
            let post = conn
                .query_row(
                    &format!(
                        "SELECT {POST_COLUMNS}, users.username FROM posts
                         INNER JOIN users ON posts.author_id = users.id
                         WHERE posts.id = ?1"
                    ),
                    params![id],
                    |row| {
                        Ok(PostWithAuthor {
                            post: post_from_row(row)?,
                            author_username: row.get(5)?,
                        })
                    },
                )
                .optional()?;
            Ok(post)
        })
        .await
    }

    async fn list_posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_COLUMNS} FROM posts WHERE posts.author_id = ?1 ORDER BY posts.id DESC"
            ))?;
            let posts = stmt
                .query_map(params![author_id], post_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(posts)
        })
        .await
    }

    async fn update_post(&self, id: PostId, draft: &PostDraft) -> Result<bool, StoreError> {
        let draft = draft.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE posts SET title = ?1, body = ?2 WHERE id = ?3",
                params![draft.title, draft.body, id],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn delete_post(&self, id: PostId) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
    }
}

fn is_constraint(err: &rusqlite::Error, extended_code: i32) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation && e.extended_code == extended_code
    )
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    let created_at: String = row.get(1)?;
    Ok(Post {
        id: row.get(0)?,
        created_at: parse_timestamp(&created_at).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        title: row.get(2)?,
        body: row.get(3)?,
        author_id: row.get(4)?,
    })
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}
