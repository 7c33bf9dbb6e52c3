//! HTTP API
//!
//! Endpoints:
//! - GET / - liveness probe, fixed JSON
//! - GET|POST /getsearchresults - ranked results and predicted tags

pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use stacksearch_core::SearchEngine;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ServerConfig;
pub use error::ApiError;
pub use handlers::SearchParams;
pub use state::AppState;

/// Build the axum router with all routes
pub fn build_router(engine: Arc<SearchEngine>, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::homepage))
        .route(
            "/getsearchresults",
            get(handlers::get_search_results).post(handlers::get_search_results),
        )
        .layer(
            ServiceBuilder::new()
                .concurrency_limit(config.concurrency_limit)
                .layer(cors),
        )
        .with_state(AppState::new(engine))
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(engine: Arc<SearchEngine>, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = build_router(engine, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("StackSearch listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("StackSearch server shutting down");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

// ============================================================================
// TESTS
// ============================================================================
