use campaign_dashboard::{AppState, Config, Dashboard, FileKeyValueStore, router};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    fs::create_dir_all(&config.data_dir).await?;

    let backend = Arc::new(FileKeyValueStore::new(&config.data_dir));
    let message_timeout = config.message_timeout;
    let dashboard =
        tokio::task::spawn_blocking(move || Dashboard::open(backend, message_timeout)).await?;
    let state = AppState::new(dashboard);
    let app = router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Last chance to get the in-memory list onto disk.
    let dashboard = Arc::clone(&state.dashboard).lock_owned().await;
    tokio::task::spawn_blocking(move || match dashboard.persist() {
        Ok(()) => info!(count = dashboard.records().len(), "campaigns saved on shutdown"),
        Err(err) => error!("failed to save campaigns on shutdown: {err}"),
    })
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
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
    info!("shutting down");
}
