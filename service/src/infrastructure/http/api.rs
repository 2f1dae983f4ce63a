use std::convert::Infallible;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::import::SpreadsheetRejection;
use crate::domain::repository::RepositoryError;

pub const API_VERSION: &str = "1.0.0";

/// Correlation id propagated from the `x-request-id` header, `"unknown"`
/// when the caller sends none.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        Ok(Self(id))
    }
}

/// `Json` with the rejection shaped like every other validation error.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

// ApiSuccess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, request_id: &RequestId, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(data, request_id)))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Generic response structure shared by all successful API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponseBody<T> {
    pub fn new(data: T, request_id: &RequestId) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::now(request_id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub version: &'static str,
}

impl ResponseMeta {
    fn now(request_id: &RequestId) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: request_id.0.clone(),
            version: API_VERSION,
        }
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    NotFound,
    InvalidFileType,
    FileTooLarge,
    Internal(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::ValidationFailed(cause) => Self::Validation(cause),
        }
    }
}

impl From<SpreadsheetRejection> for ApiError {
    fn from(value: SpreadsheetRejection) -> Self {
        match value {
            SpreadsheetRejection::UnsupportedFormat => Self::InvalidFileType,
            SpreadsheetRejection::TooLarge => Self::FileTooLarge,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, code, message) = match self {
            Validation(message) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
            NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "文章不存在".to_string(),
            ),
            InvalidFileType => (
                StatusCode::BAD_REQUEST,
                "INVALID_FILE_TYPE",
                "不支持的文件格式，请选择 .xlsx, .xls 或 .csv 文件".to_string(),
            ),
            FileTooLarge => (
                StatusCode::BAD_REQUEST,
                "FILE_TOO_LARGE",
                "文件大小超过限制，最大支持10MB".to_string(),
            ),
            Internal(cause) => {
                tracing::error!("{}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "服务器内部错误".to_string(),
                )
            }
        };

        (status, Json(ApiErrorBody::new(code, message))).into_response()
    }
}

/// Error bodies carry no meta block; only successful responses do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: ApiErrorData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: &'static str,
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(code: &'static str, message: String) -> Self {
        Self {
            success: false,
            error: ApiErrorData { code, message },
        }
    }
}
