//! Pagination utilities for list endpoints.
//!
//! Query strings arrive as `?limit=20&page=3` or `?limit=20&offset=40`.
//! When `page` is given it takes precedence over `offset`. Empty values
//! (`?limit=`) are treated as absent.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Metadata about a paginated response.
///
/// ```json
/// { "total": 100, "limit": 10, "page": 3, "has_more": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Number of items skipped (only present for offset-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present for page-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a result set of `total` rows fetched with `params`.
    #[must_use]
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        let page = params.page();

        Self {
            total,
            limit,
            offset: if page.is_some() { None } else { Some(offset) },
            page,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// Query parameters for pagination.
///
/// - `limit` is clamped to `[1, 100]` (default 10)
/// - `offset` is clamped to a minimum of 0
/// - `page` is 1-indexed and clamped to a minimum of 1
/// - the derived offset saturates at `i64::MAX` instead of overflowing
#[derive(Debug, Clone, Hash, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1).saturating_mul(self.limit()),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        for (input, expected) in [(Some(0), 1), (Some(-3), 1), (Some(50), 50), (Some(101), 100)] {
            assert_eq!(params(input, None, None).limit(), expected);
        }
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let p = params(Some(20), Some(7), Some(3));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn test_negative_offset_and_page() {
        assert_eq!(params(None, Some(-5), None).offset(), 0);
        assert_eq!(params(None, None, Some(-2)).offset(), 0);
        assert_eq!(params(None, None, Some(-2)).page(), Some(1));
    }

    #[test]
    fn test_query_string_values_and_empty_strings() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"25","page":""}"#).unwrap();
        assert_eq!(p.limit(), 25);
        assert_eq!(p.page(), None);

        let p: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_meta_for_page_request() {
        let meta = PaginationMeta::new(&params(Some(10), None, Some(2)), 25);
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.offset, None);
        assert!(meta.has_more);

        let last = PaginationMeta::new(&params(Some(10), None, Some(3)), 25);
        assert!(!last.has_more);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let far_page = params(Some(100), None, Some(i64::MAX));
        assert_eq!(far_page.offset(), i64::MAX);
        let meta = PaginationMeta::new(&far_page, 25);
        assert!(!meta.has_more);

        let far_offset = params(Some(100), Some(i64::MAX), None);
        assert_eq!(far_offset.offset(), i64::MAX);
        assert!(!PaginationMeta::new(&far_offset, 25).has_more);
    }

    #[test]
    fn test_meta_for_offset_request_serializes_offset() {
        let meta = PaginationMeta::new(&params(Some(5), Some(5), None), 10);
        assert!(!meta.has_more);

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""offset":5"#));
        assert!(!json.contains("page"));
    }
}
