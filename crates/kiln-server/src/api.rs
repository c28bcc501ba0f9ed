//! HTTP surface of the kiln service
//!
//! One compile endpoint, a health check, and a JSON 404 fallback. The browser
//! frontend is served from elsewhere, so CORS is permissive and every error
//! body is JSON, never HTML.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use kiln::{Sandbox, SandboxError, SubmitRequest};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::report;

/// Shared state behind the router
#[derive(Clone)]
pub struct AppState {
    sandbox: Arc<Sandbox>,

    /// Compile-request cap; `None` means unbounded
    compile_permits: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(sandbox: Sandbox, max_concurrency: usize) -> Self {
        Self {
            sandbox: Arc::new(sandbox),
            compile_permits: match max_concurrency {
                0 => None,
                n => Some(Arc::new(Semaphore::new(n))),
            },
        }
    }
}

/// Wire shape of a compile request
#[derive(Debug, Deserialize)]
struct CompileBody {
    #[serde(default)]
    code: String,

    /// Informational only; this is a single-language sandbox
    #[serde(default)]
    language: Option<String>,

    /// Stdin for the running program
    #[serde(default)]
    input: Option<String>,

    /// Informational only
    #[serde(default)]
    topic: Option<String>,
}

/// Build the service router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/compile", post(compile_handler))
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
///
/// Runs until the provided shutdown future resolves, then finishes in-flight
/// requests before returning.
pub async fn serve(
    state: AppState,
    addr: std::net::SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn compile_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    // The body is parsed by hand so an empty or malformed payload gets the
    // same JSON 400 shape as every other failure
    let Ok(body) = serde_json::from_slice::<CompileBody>(&body) else {
        return report::error_body(StatusCode::BAD_REQUEST, "No data provided");
    };

    if body.code.trim().is_empty() {
        return report::failure_body(StatusCode::BAD_REQUEST, "Code cannot be empty");
    }

    debug!(
        language = body.language.as_deref().unwrap_or("c"),
        topic = body.topic.as_deref(),
        code_len = body.code.len(),
        "compile request"
    );

    let _permit = match state.compile_permits {
        Some(ref permits) => match permits.clone().acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                return report::failure_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service is shutting down",
                );
            }
        },
        None => None,
    };

    let request = SubmitRequest {
        source: body.code,
        // An empty input string means no stdin, same as absence
        stdin: body.input.filter(|s| !s.is_empty()),
    };

    match state.sandbox.submit(request).await {
        Ok(outcome) => report::respond(outcome, &state.sandbox.config().limits),
        Err(SandboxError::EmptySource) => {
            report::failure_body(StatusCode::BAD_REQUEST, "Code cannot be empty")
        }
        Err(e) => {
            error!(error = %e, "sandbox fault");
            report::failure_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let toolchain = if state.sandbox.toolchain_status().await.is_available() {
        "available"
    } else {
        "missing"
    };

    Json(json!({
        "status": "healthy",
        "service": "kiln",
        "version": env!("CARGO_PKG_VERSION"),
        "toolchain": toolchain,
    }))
}

async fn fallback_handler() -> impl IntoResponse {
    report::error_body(StatusCode::NOT_FOUND, "Endpoint not found")
}
