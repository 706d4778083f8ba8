//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ForumStore trait.

use crate::records::{ForumPost, ForumUser};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ForumStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const USER_COLUMNS: &str =
    "id, username, role, join_date, messages, reaction_score, points, last_updated";

const POST_COLUMNS: &str =
    "id, user_id, username, thread, message, likes, time_posted, last_updated";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_users(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> StorageResult<Vec<ForumUser>> {
        let mut stmt = self.conn.prepare(sql)?;
        let users = stmt
            .query_map(params, user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn query_posts(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> StorageResult<Vec<ForumPost>> {
        let mut stmt = self.conn.prepare(sql)?;
        let posts = stmt
            .query_map(params, post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn count(&self, table: &str) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<ForumUser> {
    Ok(ForumUser {
        id: row.get(0)?,
        username: row.get(1)?,
        role: row.get(2)?,
        join_date: row.get(3)?,
        messages: row.get(4)?,
        reaction_score: row.get(5)?,
        points: row.get(6)?,
        last_updated: Some(row.get(7)?),
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<ForumPost> {
    Ok(ForumPost {
        id: row.get(0)?,
        user_id: row.get(1)?,
        username: row.get(2)?,
        thread: row.get(3)?,
        message: row.get(4)?,
        likes: row.get(5)?,
        time_posted: row.get(6)?,
        last_updated: Some(row.get(7)?),
    })
}

impl ForumStore for SqliteStorage {
    // ===== Upserts =====

    fn upsert_user(&mut self, user: &ForumUser) -> StorageResult<DateTime<Utc>> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO users (id, username, role, join_date, messages, reaction_score, points, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                role = excluded.role,
                join_date = excluded.join_date,
                messages = excluded.messages,
                reaction_score = excluded.reaction_score,
                points = excluded.points,
                last_updated = excluded.last_updated",
            params![
                user.id,
                user.username,
                user.role,
                user.join_date,
                user.messages,
                user.reaction_score,
                user.points,
                now
            ],
        )?;
        Ok(now)
    }

    fn upsert_post(&mut self, post: &ForumPost) -> StorageResult<DateTime<Utc>> {
        let author_known = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![post.user_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();

        if !author_known {
            return Err(StorageError::UnknownUser {
                post_id: post.id,
                user_id: post.user_id,
            });
        }

        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO posts (id, user_id, username, thread, message, likes, time_posted, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                username = excluded.username,
                thread = excluded.thread,
                message = excluded.message,
                likes = excluded.likes,
                time_posted = excluded.time_posted,
                last_updated = excluded.last_updated",
            params![
                post.id,
                post.user_id,
                post.username,
                post.thread,
                post.message,
                post.likes,
                post.time_posted,
                now
            ],
        )?;
        Ok(now)
    }

    // ===== Lookups =====

    fn get_user(&self, id: i64) -> StorageResult<Option<ForumUser>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_post(&self, id: i64) -> StorageResult<Option<ForumPost>> {
        let post = self
            .conn
            .query_row(
                &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
                params![id],
                post_from_row,
            )
            .optional()?;
        Ok(post)
    }

    fn posts_by_thread(&self, thread: &str) -> StorageResult<Vec<ForumPost>> {
        self.query_posts(
            &format!(
                "SELECT {} FROM posts WHERE thread = ?1 ORDER BY time_posted, id",
                POST_COLUMNS
            ),
            params![thread],
        )
    }

    fn users_by_name(&self, username: &str) -> StorageResult<Vec<ForumUser>> {
        self.query_users(
            &format!(
                "SELECT {} FROM users WHERE username = ?1 ORDER BY id",
                USER_COLUMNS
            ),
            params![username],
        )
    }

    fn all_users(&self) -> StorageResult<Vec<ForumUser>> {
        self.query_users(
            &format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS),
            params![],
        )
    }

    // ===== Statistics =====

    fn count_users(&self) -> StorageResult<u64> {
        self.count("users")
    }

    fn count_posts(&self) -> StorageResult<u64> {
        self.count("posts")
    }
}
