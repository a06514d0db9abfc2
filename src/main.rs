use dotenvy::dotenv;
use tracing::{error, info, warn};

use lescracks::logging::init_tracing;
use lescracks::metrics::{init_metrics, metrics_app};
use lescracks::router::init_router;
use lescracks::state::init_app_state;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let _log_guard = init_tracing();

    let metrics_handle = match init_metrics() {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "Metrics disabled: recorder could not be installed");
            None
        }
    };

    let state = match init_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let addr = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %addr, error = %e, "Cannot bind listener");
            std::process::exit(1);
        }
    };

    info!(address = %addr, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
