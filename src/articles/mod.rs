//! The article resource: validation, partial updates, pagination and the
//! five CRUD operations over the store.

mod error;
pub mod input;
pub mod pagination;
pub mod patch;
mod service;
pub mod validation;

pub use error::ArticleError;
pub use input::{CreateArticle, ListParams, UpdateArticle};
pub use pagination::{ArticlePage, PageMeta, PageRequest};
pub use patch::Patch;
pub use service::{create_article, delete_article, get_article, list_articles, update_article};
pub use validation::{Author, Content, Title};
