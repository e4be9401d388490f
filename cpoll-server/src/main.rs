//! cpoll-server - campaign polling service
//!
//! Serves the intake submission, persona and admin dashboard API.
//!
//! Configuration priority: command line, environment, TOML file, compiled
//! defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cpoll_common::auth::DigestCredentialChecker;
use cpoll_common::config::{resolve_config_path, StorageBackend, TomlConfig};
use cpoll_common::reference::ReferenceData;
use cpoll_common::store::open_store;
use cpoll_server::services::ChatPersonaClient;
use cpoll_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for cpoll-server
#[derive(Parser, Debug)]
#[command(name = "cpoll-server")]
#[command(about = "Campaign polling service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CPOLL_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CPOLL_PORT")]
    port: Option<u16>,

    /// Response store backend: file or sql
    #[arg(long)]
    storage_backend: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config_result = TomlConfig::load(config_path.as_deref());
    let log_level = config_result
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting cpoll-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config = config_result.context("Failed to load configuration")?;
    config
        .apply_env_overrides()
        .context("Invalid environment configuration")?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend) = args.storage_backend {
        config.storage.backend = backend;
    }

    let reference = ReferenceData::load(config.reference_data.as_deref())
        .context("Failed to load state/LGA reference data")?;
    info!("Reference data: {} states", reference.states.len());

    let store = match open_store(&config.storage).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open response store: {}", e);
            return Err(e).context("Response store unavailable");
        }
    };

    let persona = ChatPersonaClient::new(&config.persona)
        .context("Failed to initialize persona client")?;

    let credentials = DigestCredentialChecker::new(config.admin.token_sha256.as_deref())
        .context("Invalid admin credential configuration")?;
    if credentials.is_configured() {
        info!("✓ Admin credential configured");
    } else {
        warn!("No admin token digest configured; admin endpoints will reject every request");
    }

    let state = AppState::new(
        store,
        Arc::new(persona),
        Arc::new(credentials),
        Arc::new(reference),
    );
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("cpoll-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
