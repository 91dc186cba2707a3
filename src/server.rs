//! 服务启动：根据配置组装存储与路由，监听端口，优雅关闭

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::app::{
    self,
    usuarios::{AppState, MemoryUsuarioStore, PgUsuarioStore, UsuarioStore},
};
use crate::config::{Backend, Config, DatabaseConfig};
use crate::infrastructure::ConnectionProvider;

/// 根据配置创建存储实现
pub fn build_store(config: &DatabaseConfig) -> Result<Arc<dyn UsuarioStore>, sqlx::Error> {
    match config.backend {
        Backend::Postgres => {
            let provider = ConnectionProvider::new(config)?;
            Ok(Arc::new(PgUsuarioStore::new(provider)))
        }
        Backend::Memory => {
            warn!("Using in-memory store, data is lost on shutdown");
            Ok(Arc::new(MemoryUsuarioStore::new()))
        }
    }
}

/// 根据配置创建完整的应用路由
pub fn build_app(config: &Config) -> Result<Router, sqlx::Error> {
    let store = build_store(&config.database)?;
    if config.compat.legacy_responses {
        info!("Legacy responses enabled: errors are returned with status 200");
    }
    let state = AppState::new(store, config.compat.legacy_responses)
        .with_body_limit(config.http.max_body_bytes);
    Ok(app::routes(state))
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let app = build_app(&config)?;

    let listener =
        TcpListener::bind((config.http.bind_address.as_str(), config.http.port)).await?;
    let addr = listener.local_addr()?;

    info!("Servidor rodando na porta {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
