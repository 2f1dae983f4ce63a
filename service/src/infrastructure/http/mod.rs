use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;

use crate::domain::AppState;
use crate::domain::import::MAX_SPREADSHEET_BYTES;
use crate::infrastructure::http::handlers::articles::{
    article_stats, bulk_operation_status, bulk_update_articles, create_article, delete_article,
    import_articles, list_articles, update_article,
};
use crate::infrastructure::http::handlers::health_check;

pub mod api;
mod handlers;
mod querystring;

/// The size rule in the import handler answers FILE_TOO_LARGE; the
/// transport limit sits above the cap instead of at it.
const MAX_UPLOAD_BODY_BYTES: usize = 2 * MAX_SPREADSHEET_BYTES;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        let router = router(state);
        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!("listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

fn router(state: impl AppState) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(trace_layer)
        .layer(prometheus_layer)
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/articles",
            get(list_articles::<S>)
                .post(create_article::<S>)
                .put(update_article::<S>)
                .delete(delete_article::<S>),
        )
        .route(
            "/articles/bulk",
            post(bulk_update_articles::<S>).get(bulk_operation_status),
        )
        .route(
            "/articles/import",
            post(import_articles::<S>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .route("/articles/stats", get(article_stats::<S>))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;
    use wemp_common::seed::sample_articles;

    use super::*;
    use crate::infrastructure::AppStateImpl;
    use crate::infrastructure::import::FixtureSpreadsheetParser;
    use crate::infrastructure::memory::InMemoryArticleRepository;

    // The prometheus layer installs a global recorder, so tests exercise the
    // api routes directly.
    fn test_router() -> Router {
        let state = AppStateImpl::new(
            InMemoryArticleRepository::seeded(sample_articles()),
            FixtureSpreadsheetParser::default(),
        );
        Router::new().nest("/api", api_routes()).with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_wraps_seeded_articles_in_the_envelope() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/articles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"]["pagination"]["total"], 3);
        assert_eq!(body["meta"]["requestId"], "unknown");
        assert_eq!(body["meta"]["version"], "1.0.0");
    }

    #[tokio::test]
    async fn request_id_header_is_echoed_in_the_meta_block() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/articles")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["meta"]["requestId"], "req-42");
    }

    #[tokio::test]
    async fn bulk_without_ids_is_a_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/articles/bulk")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"ids": [], "action": "publish"}"#))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "请提供有效的文章ID列表");
    }

    #[tokio::test]
    async fn bulk_without_action_is_a_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/articles/bulk")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"ids": ["1"]}"#))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "请指定操作类型");
    }

    #[tokio::test]
    async fn deleting_an_unknown_article_is_not_found() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/articles?id=9")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "文章不存在");
    }

    #[tokio::test]
    async fn created_articles_come_back_with_fresh_ids() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/articles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"新文章","content":"正文","author":"张三"}"#,
            ))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "draft");
        assert_eq!(body["data"]["readCount"], 0);
        assert!(body["data"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn put_merges_only_the_provided_fields() {
        let router = test_router();

        let request = Request::builder()
            .method("PUT")
            .uri("/api/articles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"id":"3","title":"改过的标题"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["title"], "改过的标题");
        assert_eq!(body["data"]["author"], "王五");
        assert_eq!(body["data"]["status"], "draft");
    }

    #[tokio::test]
    async fn stats_narrow_to_the_requested_account() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/articles/stats?accountId=account1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["published"], 1);
        assert_eq!(body["data"]["accounts"].as_array().unwrap().len(), 1);
    }

    fn multipart_upload(file_name: &str, content_type: &str) -> Request<Body> {
        let boundary = "article-import-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             title,content,author\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/articles/import")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn import_stores_the_parsed_rows() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(multipart_upload("十一月选题.csv", "text/csv"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["imported"], 3);
        assert_eq!(body["data"]["skipped"], 0);
        assert_eq!(body["data"]["fileName"], "十一月选题.csv");

        let listing = router
            .oneshot(
                Request::builder()
                    .uri("/api/articles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listing = body_json(listing).await;
        assert_eq!(listing["data"]["pagination"]["total"], 6);
    }

    #[tokio::test]
    async fn import_rejects_files_that_are_not_spreadsheets() {
        let response = test_router()
            .oneshot(multipart_upload("notes.txt", "text/plain"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_FILE_TYPE");
    }
}
