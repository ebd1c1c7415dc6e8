use crate::app::router::{build_router, AppState};
use crate::config::ServerConfig;
use crate::utils::error::Result;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.listen_addr()).await?;
    run(listener, config, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("🚀 Server started on port {}", addr.port());
    tracing::debug!(
        "Mounts: static={} public={} uploads={}",
        config.static_dir,
        config.public_dir,
        config.upload_dir
    );

    let router = build_router(AppState::new(config));

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Cannot listen for Ctrl-C, running until killed: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
