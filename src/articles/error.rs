use thiserror::Error;

use crate::storage::DatabaseError;

/// Every way an article operation can fail.
#[derive(Debug, Error)]
pub enum ArticleError {
    /// One or more fields broke their rules
    #[error("Validation failed")]
    Validation(garde::Report),

    /// No article has the requested id
    #[error("Article {0} not found")]
    NotFound(i64),

    /// An update supplied none of the known fields
    #[error("No fields provided for update")]
    EmptyUpdate,

    /// The store failed; the detail is for logs only
    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl From<garde::Report> for ArticleError {
    fn from(report: garde::Report) -> Self {
        ArticleError::Validation(report)
    }
}
