/*!
 * HTTP boundary of the translation cache.
 *
 * - `handlers`: route handlers
 * - `query`: strict parsing of the translate query string
 * - `responses`: mapping of service errors to status codes and bodies
 */

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::http::Method;
use axum::middleware::{self as axum_mw, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use crate::translation::TranslationService;

pub mod handlers;
pub mod query;
pub mod responses;

pub use responses::ApiError;

/// Shared state for all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside translation service
    pub service: TranslationService,
}

impl AppState {
    pub fn new(service: TranslationService) -> Self {
        Self { service }
    }
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    debug!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Build the axum router with all API routes
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/translate", get(handlers::translate))
        .route("/api/health", get(handlers::health))
        .route("/api/languages", get(handlers::languages))
        .route("/api/cache/stats", get(handlers::cache_stats))
        .layer(cors)
        .layer(axum_mw::from_fn(log_requests))
        .with_state(Arc::new(state))
}

/// Serve the API on `addr` until `shutdown` resolves
pub async fn serve<F>(addr: &str, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve_with_listener(listener, state, shutdown).await
}

/// Serve the API on an already bound listener until `shutdown` resolves
pub async fn serve_with_listener<F>(listener: tokio::net::TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr().context("Failed to read listener address")?;
    info!("Translation API listening on http://{}", local_addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Translation API stopped");
    Ok(())
}
