//! Client payloads and their conversion into validated storage requests.

use garde::Validate;
use serde::Deserialize;

use super::pagination::{PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE};
use super::patch::Patch;
use super::validation::{
    join_tags, not_null, nullable_patch, required_patch, resolve_author, Author, Content, Title,
};
use crate::storage::{ArticleChanges, ArticleQuery, NewArticle};

// ============================================================================
// Create
// ============================================================================

/// Body of a create request.
///
/// `title` and `content` are optional at the serde level so a missing field
/// is reported as a field error instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateArticle {
    #[serde(default)]
    #[garde(required, dive)]
    pub title: Option<Title>,
    #[serde(default)]
    #[garde(required, dive)]
    pub content: Option<Content>,
    #[serde(default)]
    #[garde(skip)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    #[garde(dive)]
    pub author: Option<Author>,
    #[serde(default)]
    #[garde(skip)]
    pub is_published: Option<bool>,
}

impl CreateArticle {
    /// Check every field, reporting all violations together.
    pub fn into_new_article(self) -> Result<NewArticle, garde::Report> {
        self.validate()?;
        Ok(NewArticle {
            title: self.title.map(|t| t.0).unwrap_or_default(),
            content: self.content.map(|c| c.0).unwrap_or_default(),
            tags: self.tags.as_deref().and_then(join_tags),
            author: resolve_author(self.author),
            is_published: self.is_published.unwrap_or(false),
        })
    }
}

// ============================================================================
// Update
// ============================================================================

/// Body of an update request. Every field tracks whether it was sent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArticle {
    #[serde(default)]
    #[garde(custom(required_patch))]
    pub title: Patch<Title>,
    #[serde(default)]
    #[garde(custom(required_patch))]
    pub content: Patch<Content>,
    #[serde(default)]
    #[garde(skip)]
    pub tags: Patch<Vec<String>>,
    #[serde(default)]
    #[garde(custom(nullable_patch))]
    pub author: Patch<Author>,
    #[serde(default)]
    #[garde(custom(not_null))]
    pub is_published: Patch<bool>,
}

impl UpdateArticle {
    /// True when the client sent none of the known fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_missing()
            && self.content.is_missing()
            && self.tags.is_missing()
            && self.author.is_missing()
            && self.is_published.is_missing()
    }

    /// Validate the supplied fields and turn them into column changes.
    ///
    /// Unsupplied fields stay `None` in the result. Explicit `null` clears
    /// `tags`, resets `author` to the default and is rejected for the
    /// required fields.
    pub fn into_changes(self) -> Result<ArticleChanges, garde::Report> {
        self.validate()?;
        Ok(ArticleChanges {
            title: self.title.into_option().flatten().map(|t| t.0),
            content: self.content.into_option().flatten().map(|c| c.0),
            tags: self
                .tags
                .into_option()
                .map(|v| v.as_deref().and_then(join_tags)),
            author: self.author.into_option().map(resolve_author),
            is_published: self.is_published.into_option().flatten(),
        })
    }
}

// ============================================================================
// List
// ============================================================================

/// Query-string parameters of a list request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListParams {
    #[serde(default)]
    #[garde(skip)]
    pub tag: Option<String>,
    #[serde(default)]
    #[garde(range(min = 1))]
    pub page: Option<i64>,
    #[serde(default)]
    #[garde(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl ListParams {
    /// Apply defaults and bounds, returning the page request and store query.
    pub fn into_query(self) -> Result<(PageRequest, ArticleQuery), garde::Report> {
        self.validate()?;
        let request = PageRequest {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        };
        let query = ArticleQuery {
            tag: self.tag.filter(|t| !t.is_empty()),
            offset: request.offset(),
            limit: request.limit,
        };
        Ok((request, query))
    }
}
