//! Axum routes for the extraction API
//!
//! `GET /api/getJSON?url=...` runs the pipeline for one page and answers with
//! the report, or a single flat error message.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::Result;
use crate::pipeline::{PageProcessor, PageReport, ProcessOptions};

/// Message returned for every failure before the analysis step
pub const PROCESSING_ERROR: &str = "Failed to fetch or process the URL";

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
    pub processor: PageProcessor,
    /// Cancelled on shutdown; each request works under a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(processor: PageProcessor) -> Self {
        Self {
            processor,
            shutdown: CancellationToken::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractQuery {
    pub url: Option<String>,
    #[serde(default = "default_analyze")]
    pub analyze: bool,
}

fn default_analyze() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub analysis_enabled: bool,
}

type ApiResult<T> = std::result::Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/getJSON", get(get_json))
        .route("/api/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// GET /api/getJSON?url=...
pub async fn get_json(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExtractQuery>,
) -> ApiResult<PageReport> {
    let Some(url) = query.url.filter(|url| !url.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required query parameter: url")),
        ));
    };

    let cancel = state.shutdown.child_token();
    let options = ProcessOptions {
        analyze: query.analyze,
    };

    match state.processor.process(&url, &options, &cancel).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("Failed to process {}: {}", url, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(PROCESSING_ERROR)),
            ))
        }
    }
}

// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        analysis_enabled: state.processor.has_analyzer(),
    })
}

/// Serve the API on `addr` until the state's shutdown token is cancelled
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("pagetext listening on http://{}", listener.local_addr()?);

    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::mock::MockAnalyzer;
    use crate::extractor::ExtractorConfig;
    use crate::http::{FetchConfig, PageFetcher};
    use mockito::Server;

    fn state(analyzer: Option<MockAnalyzer>) -> Arc<AppState> {
        let fetcher = PageFetcher::new(FetchConfig::default()).unwrap();
        let mut processor = PageProcessor::new(fetcher, ExtractorConfig::default());
        if let Some(analyzer) = analyzer {
            processor = processor.with_analyzer(Arc::new(analyzer));
        }
        Arc::new(AppState::new(processor))
    }

    fn query(url: Option<String>, analyze: bool) -> Query<ExtractQuery> {
        Query(ExtractQuery { url, analyze })
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/article")
            .with_status(200)
            .with_body("<html><body><h1>News</h1><p>Body text</p></body></html>")
            .create_async()
            .await;

        let analyzer = MockAnalyzer::new();
        analyzer.set_text_response("Readable.").await;
        let url = format!("{}/article", server.url());

        let result = get_json(State(state(Some(analyzer))), query(Some(url.clone()), true)).await;
        let Ok(Json(report)) = result else {
            panic!("expected a report");
        };
        assert_eq!(report.detailed_text.as_str(), "h1: News\n\np: Body text");
        assert_eq!(report.claude_analysis.as_deref(), Some("Readable."));
        assert_eq!(report.url, url);
    }

    #[tokio::test]
    async fn test_get_json_missing_url() {
        let result = get_json(State(state(None)), query(None, true)).await;
        let Err((status, Json(body))) = result else {
            panic!("expected an error");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("url"));
    }

    #[tokio::test]
    async fn test_get_json_fetch_failure_is_generic() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/down")
            .with_status(503)
            .create_async()
            .await;

        let url = format!("{}/down", server.url());
        let result = get_json(State(state(None)), query(Some(url), true)).await;
        let Err((status, Json(body))) = result else {
            panic!("expected an error");
        };
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, ErrorResponse::new(PROCESSING_ERROR));
    }

    #[tokio::test]
    async fn test_get_json_respects_analyze_flag() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<p>Hi</p>")
            .create_async()
            .await;

        let analyzer = MockAnalyzer::new();
        let url = format!("{}/", server.url());
        let result = get_json(State(state(Some(analyzer.clone()))), query(Some(url), false)).await;
        let Ok(Json(report)) = result else {
            panic!("expected a report");
        };
        assert!(report.claude_analysis.is_none());
        assert_eq!(analyzer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health(State(state(Some(MockAnalyzer::new())))).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, VERSION);
        assert!(body.analysis_enabled);
    }
}
