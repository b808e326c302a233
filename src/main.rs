use daily_log::{router, AppConfig, AppState, Catalog, FileBackend, LogStore, MemoryBackend};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("loading task catalog from {}", path.display());
            Catalog::from_json_file(path)?
        }
        None => Catalog::default(),
    };

    let store = match FileBackend::new(&config.data_dir) {
        Ok(backend) => {
            info!("storing logs in {}", backend.dir().display());
            LogStore::open(catalog, Box::new(backend))
        }
        Err(err) => {
            warn!("cannot use data directory {}: {err}", config.data_dir.display());
            LogStore::unavailable(catalog, Box::new(MemoryBackend::new()), err.to_string())
        }
    };

    let app = router(AppState::new(store));

    info!("listening on http://{}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
