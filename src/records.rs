//! Forum records extracted from thread pages

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A forum member, keyed by the forum's numeric user id
#[derive(Debug, Clone, PartialEq)]
pub struct ForumUser {
    pub id: i64,
    pub username: String,
    /// Role labels joined with a comma (empty when the member has none)
    pub role: String,
    pub join_date: NaiveDate,
    pub messages: i64,
    pub reaction_score: i64,
    pub points: i64,
    /// Set by the store on upsert; `None` until the record has been persisted
    pub last_updated: Option<DateTime<Utc>>,
}

/// A single message within a thread, keyed by the forum's numeric post id
#[derive(Debug, Clone, PartialEq)]
pub struct ForumPost {
    pub id: i64,
    pub user_id: i64,
    /// Display name at posting time, may differ from the user's current name
    pub username: String,
    /// Slug of the containing thread
    pub thread: String,
    pub message: String,
    pub likes: u32,
    pub time_posted: NaiveDateTime,
    /// Set by the store on upsert; `None` until the record has been persisted
    pub last_updated: Option<DateTime<Utc>>,
}

/// A post paired with the author record extracted from the same message block
pub type PostWithAuthor = (ForumPost, ForumUser);
