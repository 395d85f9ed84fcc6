use super::error::ArticleError;
use super::input::{CreateArticle, ListParams, UpdateArticle};
use super::pagination::ArticlePage;
use crate::storage::{Article, Database};

/// Validate and store a new article.
pub async fn create_article(db: &Database, payload: CreateArticle) -> Result<Article, ArticleError> {
    let new_article = payload.into_new_article()?;
    let article = db.insert_article(&new_article).await?;
    tracing::info!(article_id = article.id, "Article created");
    Ok(article)
}

/// Fetch one article.
pub async fn get_article(db: &Database, article_id: i64) -> Result<Article, ArticleError> {
    tracing::debug!(article_id, "get_article");
    db.get_article_by_id(article_id)
        .await?
        .ok_or(ArticleError::NotFound(article_id))
}

/// Fetch one page of articles, optionally filtered by tag.
pub async fn list_articles(db: &Database, params: ListParams) -> Result<ArticlePage, ArticleError> {
    let (request, query) = params.into_query()?;
    let (items, total) = db.list_articles(&query).await?;
    Ok(ArticlePage::new(items, request, total))
}

/// Apply the supplied fields of `payload` to an existing article.
///
/// Checks run in order: the article must exist, the payload must supply
/// at least one field, then the supplied fields must be valid.
pub async fn update_article(
    db: &Database,
    article_id: i64,
    payload: UpdateArticle,
) -> Result<Article, ArticleError> {
    if db.get_article_by_id(article_id).await?.is_none() {
        return Err(ArticleError::NotFound(article_id));
    }
    if payload.is_empty() {
        return Err(ArticleError::EmptyUpdate);
    }
    let changes = payload.into_changes()?;

    let article = db
        .update_article(article_id, &changes)
        .await?
        .ok_or(ArticleError::NotFound(article_id))?;
    tracing::info!(article_id, "Article updated");
    Ok(article)
}

/// Remove an article permanently.
pub async fn delete_article(db: &Database, article_id: i64) -> Result<(), ArticleError> {
    if !db.delete_article(article_id).await? {
        return Err(ArticleError::NotFound(article_id));
    }
    tracing::info!(article_id, "Article deleted");
    Ok(())
}
