//! Pagination math shared by the track endpoints

use serde::Serialize;
use trackdb_common::{Error, Result};

/// Page size when the client does not ask for one
pub const DEFAULT_PER_PAGE: i64 = 50;

/// Largest page size a client may request
pub const MAX_PER_PAGE: i64 = 100;

/// Requested pagination window (validated)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed page number
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate `page >= 1` and `1 <= per_page <= MAX_PER_PAGE`
    pub fn new(page: i64, per_page: i64) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidInput(format!(
                "page must be at least 1 (got {})",
                page
            )));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(Error::InvalidInput(format!(
                "per_page must be between 1 and {} (got {})",
                MAX_PER_PAGE, per_page
            )));
        }
        Ok(Self { page, per_page })
    }
}

/// Pagination metadata for one served page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Rows matching the filters, before slicing
    pub total_count: i64,
    /// `ceil(total_count / per_page)`, 0 when nothing matches
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
    /// Offset for SQL LIMIT/OFFSET
    #[serde(skip)]
    pub offset: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Compute the window for `request` over `total_count` rows.
    ///
    /// A page past the end is rejected when at least one row matches. When
    /// nothing matches any page is accepted and yields an empty result.
    pub fn compute(total_count: i64, request: PageRequest) -> Result<Self> {
        let total_pages = (total_count + request.per_page - 1) / request.per_page;

        if request.page > total_pages && total_pages > 0 {
            return Err(Error::InvalidInput(format!(
                "Page {} does not exist. Total pages: {}",
                request.page, total_pages
            )));
        }

        Ok(Self {
            total_count,
            total_pages,
            page: request.page,
            per_page: request.per_page,
            // Pages past an empty result may be arbitrarily large
            offset: (request.page - 1).saturating_mul(request.per_page),
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        })
    }
}
