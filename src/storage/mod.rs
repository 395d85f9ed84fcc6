mod articles;
mod schema;
mod types;

pub use schema::Database;
pub use types::{Article, ArticleChanges, ArticleQuery, DatabaseError, NewArticle};
