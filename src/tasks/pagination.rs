use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw `?page=&limit=` query; values are validated by [`PageRequest::parse`].
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A validated page window: `page >= 1`, `1 <= limit <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::bad_request("Page must be greater than 0"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::bad_request("Limit must be between 1 and 100"));
        }
        Ok(Self { page, limit })
    }

    pub fn parse(q: &ListQuery) -> Result<Self, AppError> {
        let page = match q.page.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PAGE,
            Some(v) => v
                .parse()
                .map_err(|_| AppError::bad_request("Page must be greater than 0"))?,
        };
        let limit = match q.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(v) => v
                .parse()
                .map_err(|_| AppError::bad_request("Limit must be between 1 and 100"))?,
        };
        Self::new(page, limit)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub limit: i64,
    pub total_tasks: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMeta {
    pub fn new(req: PageRequest, total_tasks: i64) -> Self {
        let total_pages = (total_tasks + req.limit - 1) / req.limit;
        Self {
            current_page: req.page,
            limit: req.limit,
            total_tasks,
            total_pages,
            has_next_page: req.page < total_pages,
            has_previous_page: req.page > 1,
        }
    }
}
