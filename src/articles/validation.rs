//! Field rules for article input.
//!
//! Each constrained field is a newtype that trims on deserialization and
//! carries its garde rule, so create and update share one definition.
//! Lengths are counted in characters.

use garde::Validate;
use serde::Deserialize;

use super::patch::Patch;

/// Author stored when the client omits one or sends it empty.
pub const DEFAULT_AUTHOR: &str = "Anonymous";
/// Separator used when joining the tag list into its stored form.
pub const TAG_SEPARATOR: &str = ", ";

/// Article title, 5 to 100 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(from = "String")]
#[garde(transparent)]
pub struct Title(#[garde(length(chars, min = 5, max = 100))] pub String);

/// Article body, at least 10 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(from = "String")]
#[garde(transparent)]
pub struct Content(#[garde(length(chars, min = 10))] pub String);

/// Author name, at most 50 characters after trimming. Blank means default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(from = "String")]
#[garde(transparent)]
pub struct Author(#[garde(length(chars, max = 50))] pub String);

impl From<String> for Title {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_string())
    }
}

impl From<String> for Content {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_string())
    }
}

impl From<String> for Author {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_string())
    }
}

/// Resolve the author to store.
pub fn resolve_author(author: Option<Author>) -> String {
    author
        .map(|a| a.0)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}

/// Join a tag list into its stored form.
///
/// Tags are trimmed and blank entries dropped; `None` when nothing remains.
/// Duplicates and tags containing the separator are kept as-is, so the
/// stored string cannot always be split back into the original list.
pub fn join_tags(tags: &[String]) -> Option<String> {
    let joined = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR);
    (!joined.is_empty()).then_some(joined)
}

// ============================================================================
// Patch Rules (used through `#[garde(custom(...))]`)
// ============================================================================

/// A supplied value must pass its own rule; `null` is rejected.
pub(crate) fn required_patch<T>(value: &Patch<T>, _ctx: &()) -> garde::Result
where
    T: Validate<Context = ()>,
{
    match value {
        Patch::Missing => Ok(()),
        Patch::Null => Err(garde::Error::new("must not be null")),
        Patch::Value(v) => first_error(v.validate()),
    }
}

/// A supplied value must pass its own rule; `null` is allowed.
pub(crate) fn nullable_patch<T>(value: &Patch<T>, _ctx: &()) -> garde::Result
where
    T: Validate<Context = ()>,
{
    match value {
        Patch::Value(v) => first_error(v.validate()),
        Patch::Missing | Patch::Null => Ok(()),
    }
}

/// For fields without a rule of their own: only `null` is rejected.
pub(crate) fn not_null<T>(value: &Patch<T>, _ctx: &()) -> garde::Result {
    match value {
        Patch::Null => Err(garde::Error::new("must not be null")),
        _ => Ok(()),
    }
}

fn first_error(result: Result<(), garde::Report>) -> garde::Result {
    match result {
        Ok(()) => Ok(()),
        Err(report) => match report.iter().next() {
            Some((_, error)) => Err(garde::Error::new(error.message().to_string())),
            None => Ok(()),
        },
    }
}
