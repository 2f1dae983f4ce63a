use serde::Deserialize;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Query over the article collection: filters, sort, and a page window.
/// Active filters combine with AND.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub account_id: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            account_id: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            sort_by: SortField::UpdatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

impl ArticleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match over title, content and author. An
    /// article matches when any of the three fields contains the needle.
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Exact status match; `"all"` disables the filter. Values outside the
    /// status vocabulary simply match nothing.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = (status != "all").then_some(status);
        self
    }

    /// Exact account match; `"all"` disables the filter.
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        let account_id = account_id.into();
        self.account_id = (account_id != "all").then_some(account_id);
        self
    }

    /// Set pagination using page number and page size
    ///
    /// Enforces invariants:
    /// - Page defaults to 1 if 0
    /// - Page size is clamped to 1..=200
    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = page.max(1);
        self.limit = limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }

    pub fn order_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }
}

/// Fields the collection can be sorted by. Wire names are camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Author,
    Status,
    ReadCount,
    PublishTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One window of the filtered collection plus its pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Metadata for the window `[(page-1)*limit, (page-1)*limit + limit)`.
    /// `total` is the filtered count, not the collection size.
    pub fn window(page: u32, limit: u32, total: usize) -> Self {
        let start = (page as usize).saturating_sub(1).saturating_mul(limit as usize);
        let end = start.saturating_add(limit as usize);
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit as usize) as u32,
            has_next: end < total,
            has_prev: page > 1,
        }
    }
}
