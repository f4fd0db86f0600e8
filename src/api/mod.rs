mod errors;
mod params;

use params::{DownloadRequest, GenerateRequest, GenerateResponse};

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::net::TcpListener;
use tracing::info;

use errors::ApiError;

use crate::expand::Expander;
use crate::export::{self, ExportFormat};

#[derive(Clone)]
struct AppState {
    expander: Arc<Expander>,
}

/// HTTP routes:
/// - `GET /health`
/// - `POST /api/generate` `{"keyword"}` → expanded keyword list
/// - `POST /api/download/{csv,json}` `{"keyword","keywords"}` → attachment
pub fn router(expander: Expander) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/download/csv", post(download_csv))
        .route("/api/download/json", post(download_json))
        .with_state(AppState {
            expander: Arc::new(expander),
        })
}

pub async fn serve(listener: TcpListener, expander: Expander) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("listening on http://{addr}");
    axum::serve(listener, router(expander))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "kwexpand is running",
    }))
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;
    let keyword = request.keyword.trim();
    if keyword.is_empty() {
        return Err(ApiError::MissingKeyword);
    }

    info!(keyword = %keyword, "api:generate");

    let keywords = state.expander.generate(keyword).await?;

    info!(count = keywords.len(), "generate complete");
    Ok(Json(GenerateResponse {
        success: true,
        keyword: keyword.to_string(),
        count: keywords.len(),
        keywords,
    }))
}

async fn download_csv(
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    download(payload, ExportFormat::Csv)
}

async fn download_json(
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    download(payload, ExportFormat::Json)
}

fn download(
    payload: Result<Json<DownloadRequest>, JsonRejection>,
    format: ExportFormat,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let body = export::render(&request.keywords, format)?;
    let filename = export::attachment_filename(&request.keyword, format);

    info!(filename = %filename, rows = request.keywords.len(), "api:download");

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        body,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987 UTF-8 name.
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
    let value = format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}");
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::expand::ExpansionConfig;
    use reqwest::{Client, StatusCode};
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn spawn_app(upstream: &MockServer) -> String {
        let config = ExpansionConfig {
            endpoint: format!("{}/complete/search", upstream.uri()),
            fetch_timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let expander = Expander::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(expander)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn mount_coffee_upstream(server: &MockServer) {
        Mock::given(method("GET"))
            .and(query_param("q", "coffee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                "coffee",
                ["coffee maker", "coffee shop", "tea"]
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["", []])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let upstream = MockServer::start().await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .get(format!("{base}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn generate_returns_filtered_keywords() {
        let upstream = MockServer::start().await;
        mount_coffee_upstream(&upstream).await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .post(format!("{base}/api/generate"))
            .json(&serde_json::json!({ "keyword": "  coffee " }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["keyword"], "coffee");
        assert_eq!(
            body["keywords"],
            serde_json::json!(["coffee maker", "coffee shop"])
        );
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn whitespace_keyword_rejected_before_any_fetch() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .post(format!("{base}/api/generate"))
            .json(&serde_json::json!({ "keyword": "  " }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Please provide a keyword");
    }

    #[tokio::test]
    async fn missing_keyword_field_rejected() {
        let upstream = MockServer::start().await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .post(format!("{base}/api/generate"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_rejected_with_json_error() {
        let upstream = MockServer::start().await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .post(format!("{base}/api/generate"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("Invalid request body"));
    }

    #[tokio::test]
    async fn download_csv_returns_attachment() {
        let upstream = MockServer::start().await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .post(format!("{base}/api/download/csv"))
            .json(&serde_json::json!({
                "keyword": "coffee",
                "keywords": ["coffee maker", "coffee shop"]
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");
        let disposition = response.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("filename=\"coffee-keywords.csv\""));

        let body = response.text().await.unwrap();
        assert_eq!(body, "Keywords\ncoffee maker\ncoffee shop\n");
    }

    #[tokio::test]
    async fn download_json_returns_records() {
        let upstream = MockServer::start().await;
        let base = spawn_app(&upstream).await;

        let response = Client::new()
            .post(format!("{base}/api/download/json"))
            .json(&serde_json::json!({
                "keyword": "coffee",
                "keywords": ["coffee maker"]
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        let disposition = response.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("filename=\"coffee-keywords.json\""));

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!([{ "Keywords": "coffee maker" }]));
    }
}
