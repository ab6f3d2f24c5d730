use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Validated offset window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> crate::Result<Self> {
        if page == 0 {
            return Err(crate::Error::validation("page must be at least 1"));
        }
        if limit == 0 {
            return Err(crate::Error::validation("limit must be at least 1"));
        }
        Ok(Self { page, limit })
    }

    /// Fills missing values from config and clamps `limit` to the configured
    /// maximum.
    pub fn from_query(
        query: PageQuery,
        config: &PaginationConfig,
    ) -> crate::Result<Self> {
        let page = query.page.unwrap_or(1);
        let limit = query.limit.unwrap_or(config.default_limit);
        Self::new(page, limit.min(config.max_limit))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn skip(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn take(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let limit = i64::from(request.limit);
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: (total.max(0) + limit - 1) / limit,
        }
    }
}

/// A page of rows plus the numbers a client needs to walk the rest.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_take() {
        let req = PageRequest::new(2, 10).unwrap();
        assert_eq!(req.skip(), 10);
        assert_eq!(req.take(), 10);

        let first = PageRequest::new(1, 25).unwrap();
        assert_eq!(first.skip(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::new(1, 10).unwrap();
        assert_eq!(Pagination::new(req, 15).total_pages, 2);
        assert_eq!(Pagination::new(req, 20).total_pages, 2);
        assert_eq!(Pagination::new(req, 21).total_pages, 3);
        assert_eq!(Pagination::new(req, 0).total_pages, 0);
    }

    #[test]
    fn test_zero_page_or_limit_is_rejected() {
        assert!(matches!(
            PageRequest::new(0, 10),
            Err(crate::Error::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(crate::Error::Validation(_))
        ));
    }

    #[test]
    fn test_from_query_defaults_and_clamps() {
        let config = PaginationConfig {
            default_limit: 10,
            max_limit: 50,
        };

        let req = PageRequest::from_query(PageQuery::default(), &config).unwrap();
        assert_eq!((req.page(), req.limit()), (1, 10));

        let req = PageRequest::from_query(
            PageQuery {
                page: Some(3),
                limit: Some(500),
            },
            &config,
        )
        .unwrap();
        assert_eq!((req.page(), req.limit()), (3, 50));
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let req = PageRequest::new(2, 10).unwrap();
        let json = serde_json::to_value(Pagination::new(req, 15)).unwrap();
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["page"], 2);
    }
}
