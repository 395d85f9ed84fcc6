use sqlx::QueryBuilder;

use super::schema::Database;
use super::types::{
    Article, ArticleChanges, ArticleDbRow, ArticleQuery, DatabaseError, NewArticle,
    ARTICLE_COLUMNS,
};

impl Database {
    // ========================================================================
    // Article Mutations
    // ========================================================================

    /// Insert a new article, returning it with its assigned id and timestamps.
    pub async fn insert_article(&self, article: &NewArticle) -> Result<Article, DatabaseError> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ArticleDbRow>(&format!(
            r#"
            INSERT INTO articles (title, content, tags, author, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {ARTICLE_COLUMNS}
        "#
        ))
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.tags)
        .bind(&article.author)
        .bind(article.is_published)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into_article())
    }

    /// Apply `changes` to the article with `article_id`.
    ///
    /// Only the columns present in `changes` are written, plus `updated_at`.
    /// Returns `None` if no such article exists. An empty change set only
    /// bumps `updated_at`.
    pub async fn update_article(
        &self,
        article_id: i64,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, DatabaseError> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE articles SET ");
        let mut set = builder.separated(", ");
        if let Some(title) = &changes.title {
            set.push("title = ").push_bind_unseparated(title);
        }
        if let Some(content) = &changes.content {
            set.push("content = ").push_bind_unseparated(content);
        }
        if let Some(tags) = &changes.tags {
            set.push("tags = ").push_bind_unseparated(tags);
        }
        if let Some(author) = &changes.author {
            set.push("author = ").push_bind_unseparated(author);
        }
        if let Some(is_published) = changes.is_published {
            set.push("is_published = ").push_bind_unseparated(is_published);
        }
        set.push("updated_at = ").push_bind_unseparated(now);

        builder.push(" WHERE id = ");
        builder.push_bind(article_id);
        builder.push(" RETURNING ");
        builder.push(ARTICLE_COLUMNS);

        let row: Option<ArticleDbRow> = builder
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.map(ArticleDbRow::into_article))
    }

    /// Delete an article, returning whether a row was removed.
    pub async fn delete_article(&self, article_id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(article_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Article Queries
    // ========================================================================

    /// Get a single article by its ID.
    pub async fn get_article_by_id(&self, article_id: i64) -> Result<Option<Article>, DatabaseError> {
        let row = sqlx::query_as::<_, ArticleDbRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"
        ))
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ArticleDbRow::into_article))
    }

    /// Count and fetch one window of articles, ordered by ascending id.
    ///
    /// Returns `(items, total)` where `total` counts every article matching
    /// the tag filter, ignoring `offset`/`limit`. Both statements run in one
    /// transaction so the count and the window see the same snapshot.
    pub async fn list_articles(
        &self,
        query: &ArticleQuery,
    ) -> Result<(Vec<Article>, i64), DatabaseError> {
        let tag = query.tag.as_deref().filter(|t| !t.is_empty());
        let mut tx = self.pool.begin().await?;

        let mut count_builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM articles");
        push_tag_filter(&mut count_builder, tag);
        let (total,): (i64,) = count_builder
            .build_query_as()
            .fetch_one(&mut *tx)
            .await?;

        let mut builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles"));
        push_tag_filter(&mut builder, tag);
        builder.push(" ORDER BY id ASC LIMIT ");
        builder.push_bind(query.limit);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset);

        let rows: Vec<ArticleDbRow> = builder.build_query_as().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        tracing::debug!(
            tag = ?tag,
            offset = query.offset,
            limit = query.limit,
            total = total,
            returned = rows.len(),
            "list_articles"
        );

        Ok((rows.into_iter().map(ArticleDbRow::into_article).collect(), total))
    }
}

/// `instr` avoids LIKE wildcard escaping; `lower()` folds ASCII only.
fn push_tag_filter<'a>(builder: &mut QueryBuilder<'a, sqlx::Sqlite>, tag: Option<&'a str>) {
    if let Some(tag) = tag {
        builder.push(" WHERE tags IS NOT NULL AND instr(lower(tags), lower(");
        builder.push_bind(tag);
        builder.push(")) > 0");
    }
}
