use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process holds a lock on the database file
    #[error("The database is locked by another process. Please close it and try again.")]
    Locked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::Locked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all surface
/// through the error text only.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

// ============================================================================
// Write Models
// ============================================================================

/// A validated article ready to be inserted.
///
/// Produced by `articles::input::CreateArticle::validate`, so every string
/// here is already trimmed and within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    /// Tags joined with `", "`; `None` means no tags.
    pub tags: Option<String>,
    pub author: String,
    pub is_published: bool,
}

/// The set of columns an update touches.
///
/// `None` means "leave the stored value alone". For `tags`, `Some(None)`
/// clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Option<String>>,
    pub author: Option<String>,
    pub is_published: Option<bool>,
}

/// Filter and window for a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Case-insensitive substring matched against the stored tags string
    pub tag: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

// ============================================================================
// Row Types
// ============================================================================

/// Column list shared by every query that returns full articles.
pub(crate) const ARTICLE_COLUMNS: &str =
    "id, title, content, tags, author, is_published, created_at, updated_at";

/// Internal row type for Article queries (used by sqlx FromRow)
/// Converts to Article via into_article()
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleDbRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub author: String,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ArticleDbRow {
    pub(crate) fn into_article(self) -> Article {
        Article {
            id: self.id,
            title: self.title,
            content: self.content,
            tags: self.tags,
            author: self.author,
            is_published: self.is_published,
            created_at: from_unix(self.created_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}

fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

// ============================================================================
// Data Structures
// ============================================================================

/// Article as stored and returned to clients
///
/// `tags` is the joined string exactly as persisted; the list given at
/// creation time is not recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub author: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
