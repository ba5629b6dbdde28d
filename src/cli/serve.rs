use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::{self, AppState};
use crate::cli::commands::ServeArgs;
use crate::config::StorageConfig;

pub fn run(args: &ServeArgs, storage: &StorageConfig) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "failed to create tokio runtime");
            return 1;
        }
    };

    match runtime.block_on(serve(args, storage)) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("Error: {error:#}");
            1
        }
    }
}

async fn serve(args: &ServeArgs, storage: &StorageConfig) -> anyhow::Result<()> {
    let server = args.server_config();
    let address = server.address()?;

    // Ids are bootstrapped from storage before the listener accepts anything.
    let service = super::open_service(storage, true)
        .with_context(|| format!("opening {} storage at {}", storage.kind.as_str(), storage.location()))?;
    let cors = api::cors_layer(&server.cors_origins)?;
    let app = api::router(AppState::new(service), cors);

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!(
        address = %listener.local_addr().unwrap_or(address),
        storage = storage.kind.as_str(),
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server exited");
    Ok(())
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
