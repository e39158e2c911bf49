//! HCD mentor - staged design-thinking sessions with an AI mentor
//!
//! A Rust backend that walks a student through Ignite, Huddle and Build,
//! talking to an external AI gateway under a persona per stage.

mod api;
mod catalog;
mod llm;
mod persona;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use llm::{GatewayConfig, HttpGateway, LoggingGateway};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8000;

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
struct MentorConfig {
    port: u16,
    gateway: GatewayConfig,
}

impl MentorConfig {
    fn from_env() -> Self {
        let port = std::env::var("HCD_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            gateway: GatewayConfig::from_env(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hcd_mentor=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = MentorConfig::from_env();

    // AI gateway
    let gateway = LoggingGateway::new(HttpGateway::new(&config.gateway)?);
    tracing::info!(endpoint = %config.gateway.endpoint, "AI gateway configured");

    // One session per process
    let session = runtime::spawn_session(gateway);
    let state = AppState::new(session);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("HCD mentor server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
