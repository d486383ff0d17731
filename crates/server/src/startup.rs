use std::{env, net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, ServerConfig, StorageBackend};
use dotenvy::dotenv;
use service::account::{
    repo::seaorm::SeaOrmAccountRepository, repository::memory::InMemoryAccountRepository,
    AccountRepository,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`). Without a file, fall back to
/// defaults plus `SERVER_HOST`/`SERVER_PORT`; a file that exists but fails to
/// parse or validate stops startup.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = configs::config_path();
    let mut cfg = if Path::new(&path).exists() {
        configs::load_from_file(&path).map_err(|e| StartupError::InvalidConfig(e.to_string()))?
    } else {
        warn!(%path, "config file not found; using defaults and env vars");
        let mut cfg = AppConfig::default();
        if let Ok(host) = env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg
    };
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Pick the account store named by `storage.backend`.
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn AccountRepository>, StartupError> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            info!("using in-memory account store");
            Ok(Arc::new(InMemoryAccountRepository::new()))
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_and_migrate(&cfg.database)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            info!("using postgres account store");
            Ok(Arc::new(SeaOrmAccountRepository::new(db)))
        }
    }
}

/// Assemble the application from a loaded config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let repo = build_repository(cfg).await?;
    let state = AppState::new(repo);
    Ok(routes::build_router(state, &cfg.server.api_prefix, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, prefix = %cfg.server.api_prefix, "starting account server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
