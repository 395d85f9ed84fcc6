use serde::Serialize;

use crate::storage::Article;

/// Page used when the client does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Number of eligible rows to skip: `(page - 1) * limit`.
    ///
    /// Saturates instead of overflowing; an offset past the end simply
    /// yields an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }
}

/// `ceil(total / limit)`, or 1 when `limit` is not positive.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    let total = total.max(0);
    total / limit + i64::from(total % limit != 0)
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// One page of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticlePage {
    pub items: Vec<Article>,
    pub meta: PageMeta,
}

impl ArticlePage {
    pub fn new(items: Vec<Article>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            meta: PageMeta {
                page: request.page,
                limit: request.limit,
                total,
                total_pages: total_pages(total, request.limit),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(PageRequest { page: 2, limit: 5 }.offset(), 5);
        assert_eq!(PageRequest { page: 3, limit: 100 }.offset(), 200);
    }

    #[test]
    fn test_offset_saturates() {
        let request = PageRequest {
            page: i64::MAX,
            limit: 100,
        };
        assert_eq!(request.offset(), i64::MAX);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(1, 100), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_total_pages_non_positive_limit() {
        assert_eq!(total_pages(12, 0), 1);
        assert_eq!(total_pages(12, -3), 1);
    }

    #[test]
    fn test_page_meta() {
        let page = ArticlePage::new(Vec::new(), PageRequest { page: 4, limit: 5 }, 12);
        assert_eq!(
            page.meta,
            PageMeta {
                page: 4,
                limit: 5,
                total: 12,
                total_pages: 3,
            }
        );
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0i64..100_000, limit in 1i64..=MAX_LIMIT) {
            let pages = total_pages(total, limit);
            let expected = (total as f64 / limit as f64).ceil() as i64;
            prop_assert_eq!(pages, expected);
        }

        #[test]
        fn prop_page_after_last_starts_past_end(total in 0i64..100_000, limit in 1i64..=MAX_LIMIT) {
            let request = PageRequest { page: total_pages(total, limit) + 1, limit };
            prop_assert!(request.offset() >= total);
        }

        #[test]
        fn prop_last_page_is_non_empty(total in 1i64..100_000, limit in 1i64..=MAX_LIMIT) {
            let request = PageRequest { page: total_pages(total, limit), limit };
            prop_assert!(request.offset() < total);
        }
    }
}
