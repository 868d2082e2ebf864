mod actor_framework;
mod domain;
mod clients;
mod file_store;

mod user_actor;
mod session_actor;
mod project_actor;
mod order_actor;
mod contact_actor;
mod inquiry_actor;

mod services;
mod app_system;
mod http;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use crate::app_system::{bootstrap, setup_tracing, Config, MarketSystem, StartupError};
use crate::http::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    setup_tracing();

    info!("Starting project marketplace");

    let config = Config::load()?;

    // Start the actors and wire the services
    let system = MarketSystem::new(&config).await?;
    bootstrap(&system, &config).await?;

    let app = build_router(AppState::from_system(&system), &config);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    system.shutdown().await?;

    info!("Application stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, shutting down");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
