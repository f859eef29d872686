//! Page-number pagination over a room's message history.

/// A normalized page request: `page` is 1-based and `limit` is within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Normalize raw request values.
    ///
    /// - `page` 0 means "unset" and becomes 1
    /// - `limit` 0 means "unset" and becomes `default_limit`
    /// - `limit` above `max_limit` is clamped to `max_limit`
    pub fn new(page: u32, limit: u32, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        let limit = match limit {
            0 => default_limit.clamp(1, max_limit),
            n => n.min(max_limit),
        };

        Self {
            page: page.max(1),
            limit,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Pagination metadata describing one page of a room's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_items: u64,
}

impl Pagination {
    pub fn compute(request: PageRequest, total_items: u64) -> Self {
        Self {
            page: request.page(),
            limit: request.limit(),
            total_pages: total_items.div_ceil(u64::from(request.limit())),
            total_items,
        }
    }

    /// Whether the requested page lies past the last page.
    pub fn is_out_of_range(&self) -> bool {
        u64::from(self.page) > self.total_pages
    }
}
