mod actor_framework;
mod auth;
mod chef_cache;
mod clients;
mod clock;
mod config;
mod domain;
mod error;
mod http;
mod notifications;

mod cart_actor;
mod chef_actor;
mod conversation_actor;
mod dish_actor;
mod order_actor;
mod payment_actor;
mod review_actor;
mod user_actor;

mod app_system;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::app_system::{setup_tracing, MarketSystem};
use crate::auth::StaticIdentityVerifier;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::notifications::LogPushTransport;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::load().map_err(|e| e.to_string())?;
    info!(
        credentials = %config.credentials_path,
        debug = config.debug,
        "Starting marketplace backend"
    );

    let mut verifier = StaticIdentityVerifier::new(config.debug);
    if let Some(path) = &config.token_file {
        verifier = verifier.with_token_file(path).map_err(|e| e.to_string())?;
    }
    if config.debug {
        warn!("DIARI_DEBUG is on: dev: bearer tokens are accepted for any uid");
    } else if verifier.token_count() == 0 {
        warn!("No token table configured, every bearer token will be rejected");
    }
    let identity = Arc::new(verifier);
    let system = MarketSystem::start(
        &config,
        Arc::new(LogPushTransport::default()),
        identity,
        Arc::new(SystemClock),
    );
    system.seed_admins(&config.admin_uids).await?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", address, e))?;
    info!(%address, "Listening");

    axum::serve(listener, system.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    system.shutdown().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
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
