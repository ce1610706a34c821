use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::{ChatRequest, ChatResponse, ChatService};

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}

#[derive(Serialize)]
struct InfoResponse {
    msg: &'static str,
}

/// Build the application router around the chat service
pub fn router(service: ChatService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

fn api_router() -> Router<ChatService> {
    Router::new().route("/chat", post(chat))
}

async fn root() -> Json<InfoResponse> {
    Json(InfoResponse {
        msg: "Aerodesk travel help desk. Use POST /api/chat.",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn chat(
    State(service): State<ChatService>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(service.respond(&request.message).await)
}

/// Bind and serve until the process is stopped
pub async fn run(port: u16, service: ChatService) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{port}");
    axum::serve(listener, router(service))
        .await
        .context("Web server stopped unexpectedly")?;
    Ok(())
}
