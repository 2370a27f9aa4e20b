// # ipamd - IP Address Pool Daemon
//
// This is a THIN integration layer: all pool logic lives in ipam-core.
//
// The ipamd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime and logging
// 3. Opening the configured address store
// 4. Serving the address pool over HTTP until shutdown
//
// ## Configuration
//
// - `IPAM_LISTEN_ADDR`: Socket address to bind (default 127.0.0.1:8080)
// - `IPAM_STORE_TYPE`: Type of address store (memory, file)
// - `IPAM_STORE_PATH`: Path to store file (for file store)
// - `IPAM_MAX_RANGE_SIZE`: Largest range a registration may create
// - `IPAM_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export IPAM_LISTEN_ADDR=0.0.0.0:8080
// export IPAM_STORE_TYPE=file
// export IPAM_STORE_PATH=/var/lib/ipam/addresses.json
//
// ipamd
// ```

mod api;
mod config;

use anyhow::Result;
use ipam_core::{AddressPool, IpamConfig};
use std::future::Future;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum IpamExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<IpamExitCode> for ExitCode {
    fn from(code: IpamExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    let core_config = match config.validate() {
        Ok(core_config) => core_config,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return IpamExitCode::ConfigError.into();
        }
    };

    // Both already checked by validate()
    let (Ok(log_level), Ok(listen_addr)) = (config.log_level(), config.socket_addr()) else {
        return IpamExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IpamExitCode::ConfigError.into();
    }

    info!("Starting ipamd daemon");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IpamExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(core_config, listen_addr).await {
            error!("Daemon error: {}", e);
            IpamExitCode::RuntimeError
        } else {
            IpamExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: IpamConfig, listen_addr: SocketAddr) -> Result<()> {
    info!("Store type: {}", config.store.type_name());
    info!("Maximum range size: {}", config.pool.max_range_size);

    let store = ipam_core::open_store(&config.store).await?;
    let pool = Arc::new(AddressPool::from_config(store.clone(), &config.pool));

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", listen_addr, e))?;
    info!("Listening on {}", listen_addr);

    let served = serve_until(listener, api::router(pool), wait_for_shutdown()).await;
    match &served {
        Ok(signal) => info!("Received shutdown signal: {}", signal),
        Err(e) => error!("Stopped serving: {}", e),
    }

    // Flush even when serving failed; the serving error wins
    info!("Flushing address store");
    let flushed = store.flush().await;
    served?;
    flushed?;
    info!("Shutting down daemon");

    Ok(())
}

/// Serve `app` until `shutdown` resolves
///
/// Returns the signal name `shutdown` produced. If `shutdown` fails, the
/// server still drains and the failure is returned instead.
async fn serve_until<F>(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    shutdown: F,
) -> Result<&'static str>
where
    F: Future<Output = Result<&'static str>> + Send + 'static,
{
    let (outcome_tx, outcome_rx) = tokio::sync::oneshot::channel();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = outcome_tx.send(shutdown.await);
        })
        .await?;

    outcome_rx
        .await
        .map_err(|_| anyhow::anyhow!("Server stopped without a shutdown signal"))?
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(received)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
