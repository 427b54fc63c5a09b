use axum::Router;
use clap::Parser;
use record_services::config::{Cli, ServiceKind};
use record_services::error::ServiceError;
use record_services::gateway::{self, Gateway};
use record_services::lifecycle::setup_tracing;
use record_services::{product_service, user_service};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    setup_tracing();
    let cli = Cli::parse();
    let address = cli.bind_address();

    match cli.service {
        ServiceKind::Product => {
            let service = product_service::start(&cli.store_settings())?;
            let app = product_service::router(service.controller());
            serve(product_service::SERVICE_NAME, &address, app).await?;
            service.shutdown().await
        }
        ServiceKind::User => {
            let service = user_service::start(&cli.store_settings())?;
            let app = user_service::router(service.controller());
            serve(user_service::SERVICE_NAME, &address, app).await?;
            service.shutdown().await
        }
        ServiceKind::Gateway => {
            let state = Arc::new(Gateway::new(&cli.gateway_settings())?);
            serve(gateway::SERVICE_NAME, &address, gateway::router(state)).await
        }
    }
}

/// Serves `app` until SIGINT or SIGTERM. The router is dropped when this returns.
async fn serve(service: &'static str, address: &str, app: Router) -> Result<(), ServiceError> {
    let listener = TcpListener::bind(address).await?;
    info!(service, bind = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
