//! Legal Ally session service
//!
//! Hosts one conversation with the legal-analysis backend and exposes it to
//! a browser client over HTTP and Server-Sent Events.

use legal_ally::api::{create_router, AppState};
use legal_ally::config::Config;
use legal_ally::runtime::SessionController;
use legal_ally::transport::{HttpTransport, LoggingTransport};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legal_ally=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    let transport_config = &config.transport;

    let http = HttpTransport::new(transport_config)?;
    match http.check_health().await {
        Ok(()) => tracing::info!(backend = %transport_config.base_url, "Backend reachable"),
        Err(e) => tracing::warn!(
            backend = %transport_config.base_url,
            kind = %e.kind,
            error = %e.message,
            "Backend not reachable yet; queries will fail until it is up"
        ),
    }

    let session = SessionController::new(LoggingTransport::new(Arc::new(http)));
    let state = AppState::new(session);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Legal Ally listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
