use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use catalog_api::app::{self, services::AppServices};
use catalog_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging starts so RUST_LOG from the file applies.
    let dotenv = dotenvy::dotenv();

    catalog_observability::init();

    if let Err(e) = dotenv {
        warn!(error = %e, "no .env file loaded; using process environment");
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(backend = config.storage.backend_name(), "starting product service");

    let services = Arc::new(
        AppServices::from_config(&config.storage)
            .await
            .context("failed to initialise storage backend")?,
    );

    let app = app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.shutdown().await;
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
