//! Storage traits and error types
//!
//! This module defines the repository interface the extractor persists
//! through, and associated error types.

use crate::records::{ForumPost, ForumUser};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Post {post_id} references unknown user {user_id}")]
    UnknownUser { post_id: i64, user_id: i64 },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Repository for forum users and posts
///
/// Both entities are keyed by the forum's own numeric id. An upsert inserts a
/// new row or overwrites every field of the row with the same id, and always
/// stamps `last_updated` with the time of the call. The stamp written is
/// returned to the caller.
pub trait ForumStore {
    // ===== Upserts =====

    /// Inserts or overwrites a user by id
    fn upsert_user(&mut self, user: &ForumUser) -> StorageResult<DateTime<Utc>>;

    /// Inserts or overwrites a post by id
    ///
    /// The post's author must already be stored.
    fn upsert_post(&mut self, post: &ForumPost) -> StorageResult<DateTime<Utc>>;

    // ===== Lookups =====

    /// Gets a user by id
    fn get_user(&self, id: i64) -> StorageResult<Option<ForumUser>>;

    /// Gets a post by id
    fn get_post(&self, id: i64) -> StorageResult<Option<ForumPost>>;

    /// Gets every post of a thread, oldest first
    fn posts_by_thread(&self, thread: &str) -> StorageResult<Vec<ForumPost>>;

    /// Gets users by display name (names are not unique)
    fn users_by_name(&self, username: &str) -> StorageResult<Vec<ForumUser>>;

    /// Gets all users ordered by id
    fn all_users(&self) -> StorageResult<Vec<ForumUser>>;

    // ===== Statistics =====

    fn count_users(&self) -> StorageResult<u64>;

    fn count_posts(&self) -> StorageResult<u64>;
}
