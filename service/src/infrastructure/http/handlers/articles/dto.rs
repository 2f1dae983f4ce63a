use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wemp_common::{Article, ArticlePatch, ArticleStatus};

use crate::domain::bulk::{BulkItemError, BulkPayload, BulkReport};
use crate::domain::import::{ImportOptions, ImportReport, ImportRowError, SpreadsheetFile};
use crate::domain::repository::query::{
    ArticleQuery, DEFAULT_PAGE_LIMIT, Page, SortField, SortOrder,
};

/// Query parameters of the list route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub account_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl ListArticlesParams {
    /// Empty parameters count as absent, like the dashboard sends them.
    pub fn into_query(self) -> ArticleQuery {
        let mut query = ArticleQuery::new()
            .paginate(
                self.page.unwrap_or(1),
                self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            )
            .order_by(
                self.sort_by.unwrap_or(SortField::UpdatedAt),
                self.sort_order.unwrap_or(SortOrder::Desc),
            );
        if let Some(search) = self.search.filter(|s| !s.is_empty()) {
            query = query.search(search);
        }
        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            query = query.with_status(status);
        }
        if let Some(account_id) = self.account_id.filter(|s| !s.is_empty()) {
            query = query.with_account(account_id);
        }
        query
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteArticleParams {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusParams {
    pub operation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub account_id: Option<String>,
}

/// Update body: the id plus the allow-listed partial fields.
#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub patch: ArticlePatch,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<BulkPayload>,
}

/// Wire shape of one article, camelCase like the dashboard expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    id: String,
    title: String,
    content: String,
    author: String,
    status: ArticleStatus,
    publish_time: Option<DateTime<Utc>>,
    read_count: u64,
    tags: Vec<String>,
    account_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.into_inner(),
            title: article.title,
            content: article.content,
            author: article.author,
            status: article.status,
            publish_time: article.publish_time,
            read_count: article.read_count,
            tags: article.tags,
            account_id: article.account_id.into_inner(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleListResponse {
    data: Vec<ArticleResponse>,
    pagination: PaginationResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    page: u32,
    limit: u32,
    total: usize,
    total_pages: u32,
    has_next: bool,
    has_prev: bool,
}

impl From<Page<Article>> for ArticleListResponse {
    fn from(page: Page<Article>) -> Self {
        Self {
            data: page.data.into_iter().map(ArticleResponse::from).collect(),
            pagination: PaginationResponse {
                page: page.pagination.page,
                limit: page.pagination.limit,
                total: page.pagination.total,
                total_pages: page.pagination.total_pages,
                has_next: page.pagination.has_next,
                has_prev: page.pagination.has_prev,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedArticleResponse {
    pub id: String,
}

/// Bulk outcome; `errors` is left out entirely when every id succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResponse {
    success: usize,
    failed: usize,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<BulkItemError>>,
}

impl From<BulkReport> for BulkResponse {
    fn from(report: BulkReport) -> Self {
        Self {
            success: report.success,
            failed: report.failed,
            total: report.total,
            errors: (!report.errors.is_empty()).then_some(report.errors),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusResponse {
    operation_id: String,
    status: &'static str,
    progress: u8,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl BulkStatusResponse {
    /// Fixed snapshot until a real job store backs this endpoint.
    pub fn completed(operation_id: String) -> Self {
        let now = Utc::now();
        Self {
            operation_id,
            status: "completed",
            progress: 100,
            started_at: now,
            completed_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    total: usize,
    imported: usize,
    skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ImportRowError>>,
    file_name: String,
    file_size: usize,
    options: ImportOptions,
}

impl ImportResponse {
    pub fn new(report: ImportReport, file: &SpreadsheetFile, options: ImportOptions) -> Self {
        Self {
            total: report.total,
            imported: report.imported,
            skipped: report.skipped,
            errors: (!report.errors.is_empty()).then_some(report.errors),
            file_name: file.name.clone(),
            file_size: file.bytes.len(),
            options,
        }
    }
}
