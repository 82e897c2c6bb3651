//! HTTP server exposing the hype index as JSON.
//!
//! - `GET /health` liveness and version
//! - `GET /hype?term=...` fetches a sample from the search API and scores it
//! - `POST /score` scores a sample supplied in the request body
//!
//! # Architecture
//!
//! ```text
//! Dashboard ──→ GET /hype ──→ hype-detector ──→ search API
//!                                  ↓
//!                         [aggregate + index]
//! ```

use crate::config::ApiConfig;
use crate::core::{HypeReport, ReportBuilder, VideoRecord};
use crate::source::TikTokClient;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Search API settings used by `/hype`
    pub api: ApiConfig,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(port: u16, api: ApiConfig) -> Self {
        Self { port, api }
    }
}

/// Shared server state
pub struct ServerState {
    builder: ReportBuilder,
    /// Search client, absent when no credentials are configured
    client: Option<TikTokClient>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: &ServerConfig) -> Self {
        let client = match TikTokClient::new(config.api.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Search API unavailable, /hype will report fetch failures: {}", e);
                None
            }
        };

        Self {
            builder: ReportBuilder::new(),
            client,
        }
    }

    /// Create server state around an existing client.
    pub fn with_client(client: Option<TikTokClient>) -> Self {
        Self {
            builder: ReportBuilder::new(),
            client,
        }
    }
}

/// Body of `POST /score`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Label for the report
    #[serde(default)]
    pub term: Option<String>,
    /// The sample to score
    pub videos: Vec<VideoRecord>,
}

/// Query string of `GET /hype`
#[derive(Debug, Deserialize)]
pub struct HypeQuery {
    pub term: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /score
async fn score(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ScoreRequest>,
) -> Json<HypeReport> {
    let term = request.term.unwrap_or_default();
    Json(state.builder.build(term.trim(), Some(request.videos.as_slice())))
}

/// GET /hype
///
/// A failed search still answers 200, with `fetch_status = fetch_failed` and a zero score.
async fn hype(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<HypeQuery>,
) -> Result<Json<HypeReport>, (StatusCode, Json<ErrorResponse>)> {
    let term = query
        .term
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Query parameter 'term' is required".to_string(),
                    code: "INVALID_TERM".to_string(),
                }),
            )
        })?;

    let records = match state.client {
        Some(ref client) => match client.search(term).await {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::error!("Search for '{}' failed: {}", term, e);
                None
            }
        },
        None => None,
    };

    Ok(Json(state.builder.build(term, records.as_deref())))
}

/// Build the router for the given state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/hype", get(hype))
        .route("/score", post(score))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(&config));
    serve(state, config.port).await
}

/// Run the HTTP server around prepared state
pub async fn serve(
    state: Arc<ServerState>,
    port: u16,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Hype detector server listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
