//! Cursor pagination shared by the admin list endpoints.

use serde::{Deserialize, Serialize};

/// Page size the dashboard requests by default.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> PaginatedResponse<T> {
    /// Cursor to request the next page with, if there is one.
    pub fn next_page(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Listing parameters: page size, optional free-text search and cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub search: Option<String>,
    pub cursor: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            cursor: None,
        }
    }
}

impl ListQuery {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the search term; blank terms are ignored.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Renders the query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut query = format!("limit={}", self.limit);
        if let Some(search) = &self.search {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(search));
        }
        if let Some(cursor) = &self.cursor {
            query.push_str("&cursor=");
            query.push_str(&urlencoding::encode(cursor));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_query_requests_fifty() {
        assert_eq!(ListQuery::default().to_query_string(), "limit=50");
    }

    #[test]
    fn search_is_trimmed_and_encoded() {
        let query = ListQuery::default().with_search("  ann lee&co ");
        assert_eq!(query.to_query_string(), "limit=50&search=ann%20lee%26co");
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = ListQuery::default().with_search("   ");
        assert!(query.search.is_none());
    }

    #[test]
    fn cursor_is_appended() {
        let query = ListQuery::default().with_limit(10).with_cursor("abc/1");
        assert_eq!(query.to_query_string(), "limit=10&cursor=abc%2F1");
    }

    #[test]
    fn next_page_only_when_has_more() {
        let page: PaginatedResponse<u32> =
            serde_json::from_value(json!({"data": [1, 2], "nextCursor": "n1", "hasMore": true}))
                .unwrap();
        assert_eq!(page.next_page(), Some("n1"));

        let last: PaginatedResponse<u32> =
            serde_json::from_value(json!({"data": [3], "nextCursor": "n2", "hasMore": false}))
                .unwrap();
        assert_eq!(last.next_page(), None);
    }
}
