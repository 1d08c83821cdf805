use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptsheet_api::config::ServerConfig;
use promptsheet_api::state::AppState;
use promptsheet_api::{router, services};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "promptsheet_api=debug,promptsheet_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid configuration");
    let addr = config.bind_addr().expect("Invalid bind address");
    tracing::info!(
        %addr,
        concurrency = config.pipeline.concurrency,
        notify_mode = ?config.pipeline.slack_notify_mode,
        "Loaded server configuration"
    );

    // --- Pipeline ---
    let pipeline = services::build_orchestrator(&config.pipeline).map(Arc::new);
    match &pipeline {
        Ok(_) => tracing::info!("Generation pipeline ready"),
        Err(e) => tracing::warn!(error = %e, "Generation pipeline unavailable, run requests will fail"),
    }

    // --- Router ---
    let app = router::build_app_router(AppState::new(pipeline));

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM. In-flight runs finish before the server exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
