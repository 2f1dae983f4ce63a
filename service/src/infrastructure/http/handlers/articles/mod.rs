use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use wemp_common::{ArticleDraft, ArticleId};

use crate::domain::bulk::run_bulk;
use crate::domain::import::{self, ImportOptions, SpreadsheetFile, SpreadsheetParser};
use crate::domain::repository::ArticleRepository;
use crate::domain::stats::{self, CollectionStats};
use crate::domain::AppState;
use crate::infrastructure::http::api::{ApiError, ApiJson, ApiSuccess, RequestId};
use crate::infrastructure::http::handlers::articles::dto::{
    ArticleListResponse, ArticleResponse, BulkRequest, BulkResponse, BulkStatusParams,
    BulkStatusResponse, DeleteArticleParams, DeletedArticleResponse, ImportResponse,
    ListArticlesParams, StatsParams, UpdateArticleRequest,
};
use crate::infrastructure::http::querystring::QueryString;

mod dto;

pub async fn list_articles<S: AppState>(
    QueryString(params): QueryString<ListArticlesParams>,
    request_id: RequestId,
    State(state): State<S>,
) -> Result<ApiSuccess<ArticleListResponse>, ApiError> {
    let page = state.articles().find(params.into_query()).await?;
    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        ArticleListResponse::from(page),
    ))
}

pub async fn create_article<S: AppState>(
    request_id: RequestId,
    State(state): State<S>,
    ApiJson(draft): ApiJson<ArticleDraft>,
) -> Result<ApiSuccess<ArticleResponse>, ApiError> {
    let article = state.articles().insert(draft).await?;
    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        &request_id,
        ArticleResponse::from(article),
    ))
}

pub async fn update_article<S: AppState>(
    request_id: RequestId,
    State(state): State<S>,
    ApiJson(request): ApiJson<UpdateArticleRequest>,
) -> Result<ApiSuccess<ArticleResponse>, ApiError> {
    let id = ArticleId::try_new(request.id.as_str()).map_err(|_| ApiError::NotFound)?;
    let article = state.articles().update(id, request.patch).await?;
    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        ArticleResponse::from(article),
    ))
}

pub async fn delete_article<S: AppState>(
    QueryString(params): QueryString<DeleteArticleParams>,
    request_id: RequestId,
    State(state): State<S>,
) -> Result<ApiSuccess<DeletedArticleResponse>, ApiError> {
    let raw = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("缺少文章ID".to_string()))?;
    let id = ArticleId::try_new(raw.as_str()).map_err(|_| ApiError::NotFound)?;
    state.articles().delete(id).await?;
    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        DeletedArticleResponse { id: raw },
    ))
}

/// The endpoint itself succeeds whenever the request shape is valid, even
/// if every single id failed; per-id outcomes live in the body.
pub async fn bulk_update_articles<S: AppState>(
    request_id: RequestId,
    State(state): State<S>,
    ApiJson(request): ApiJson<BulkRequest>,
) -> Result<ApiSuccess<BulkResponse>, ApiError> {
    let ids = request.ids.unwrap_or_default();
    if ids.is_empty() {
        return Err(ApiError::Validation("请提供有效的文章ID列表".to_string()));
    }
    let action = request
        .action
        .filter(|action| !action.is_empty())
        .ok_or_else(|| ApiError::Validation("请指定操作类型".to_string()))?;
    let payload = request.data.unwrap_or_default();

    let report = run_bulk(state.articles(), &ids, &action, &payload).await;
    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        BulkResponse::from(report),
    ))
}

pub async fn bulk_operation_status(
    QueryString(params): QueryString<BulkStatusParams>,
    request_id: RequestId,
) -> Result<ApiSuccess<BulkStatusResponse>, ApiError> {
    let operation_id = params
        .operation_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("缺少操作ID".to_string()))?;
    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        BulkStatusResponse::completed(operation_id),
    ))
}

pub async fn import_articles<S: AppState>(
    request_id: RequestId,
    State(state): State<S>,
    mut multipart: Multipart,
) -> Result<ApiSuccess<ImportResponse>, ApiError> {
    let mut file: Option<SpreadsheetFile> = None;
    let mut options = ImportOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(err.to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::Validation(err.to_string()))?;
                file = Some(SpreadsheetFile {
                    name: file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "options" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|err| ApiError::Validation(err.to_string()))?;
                options = serde_json::from_str(&raw)
                    .map_err(|_| ApiError::Validation("导入选项格式错误".to_string()))?;
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::Validation("请选择要导入的Excel文件".to_string()))?;
    file.validate()?;

    let rows = state.spreadsheets().parse(&file).await?;
    let report = import::run_import(state.articles(), rows, &options).await?;

    tracing::info!(
        file = %file.name,
        imported = report.imported,
        skipped = report.skipped,
        "spreadsheet import finished"
    );

    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        ImportResponse::new(report, &file, options),
    ))
}

pub async fn article_stats<S: AppState>(
    QueryString(params): QueryString<StatsParams>,
    request_id: RequestId,
    State(state): State<S>,
) -> Result<ApiSuccess<CollectionStats>, ApiError> {
    let mut articles = state.articles().list_all().await?;
    if let Some(account_id) = params.account_id.filter(|a| !a.is_empty() && a != "all") {
        articles.retain(|article| article.account_id.as_ref() == &account_id);
    }
    Ok(ApiSuccess::new(
        StatusCode::OK,
        &request_id,
        stats::collect(&articles),
    ))
}
