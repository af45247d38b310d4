mod app;
mod config;
mod error;
mod routes;
mod services;
mod state;
mod store;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let state = AppState::new();
    let last_modified = services::seed_loader::load_initial(&state).await;

    match config::campaigns_reload_interval() {
        Some(every) => {
            tracing::info!(
                path = %state.campaigns_file.display(),
                every_secs = every.as_secs(),
                "watching seed file for changes"
            );
            tokio::spawn(services::seed_loader::run(
                state.clone(),
                every,
                last_modified,
            ));
        }
        None => tracing::info!("seed file reloading disabled"),
    }

    let static_dir = config::static_dir();
    tracing::info!(static_dir = %static_dir.display(), "serving client bundle");
    let app = app::build_app(state, static_dir);

    let addr = format!("0.0.0.0:{}", config::port());
    tracing::info!("Vitrine server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
