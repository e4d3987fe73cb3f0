use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::Method;
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qwen_edit_api::models::config::AppConfig;
use qwen_edit_api::services::inference::PassthroughEngine;
use qwen_edit_api::services::provisioner::ModelProvisioner;
use qwen_edit_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Qwen API service...");

    let config = Arc::new(config);

    // One-shot weight resolution. Best-effort: the service starts and
    // serves health/models routes even when this ends up Unloaded.
    let provisioner = ModelProvisioner::new(config.clone());
    let model_state = provisioner.provision().await;

    let state = Arc::new(AppState {
        config: config.clone(),
        model_state,
        engine: Box::new(PassthroughEngine),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(|response: &Response, latency: std::time::Duration, _span: &Span| {
            tracing::info!(
                status = response.status().as_u16(),
                latency_ms = latency.as_millis() as u64,
                "response",
            );
        });

    let app = router(state)
        .layer(axum::extract::DefaultBodyLimit::max(config.max_body_bytes as usize))
        .layer(trace_layer)
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Shutdown signal received, draining connections...");
}
