//! nclex-server - Review board REST API
//!
//! Serves the exam review board over HTTP from a local SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nclex_common::config::ConfigResolver;
use nclex_server::{build_router, db, AppState, Paging};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for nclex-server
#[derive(Parser, Debug)]
#[command(name = "nclex-server")]
#[command(about = "REST API for the NCLEX review board")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(short, long, env = "NCLEX_BIND")]
    bind: Option<String>,

    /// SQLite database file, overrides the config file
    #[arg(short, long, env = "NCLEX_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nclex_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting nclex-server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;
    let mut server = config.server;
    if let Some(bind) = args.bind {
        server.bind_addr = bind;
    }
    if let Some(database) = args.database {
        server.database_path = Some(database);
    }
    server.validate().context("Invalid server configuration")?;

    let db_path = server.database_path();
    info!("Database path: {}", db_path.display());
    let pool = db::init_database(&db_path).await?;

    let paging = Paging {
        default_per_page: i64::from(server.default_per_page),
        max_per_page: i64::from(server.max_per_page),
    };
    let app = build_router(AppState::new(pool.clone(), paging), &server.cors_origins);

    let addr: SocketAddr = server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address: {}", server.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("nclex-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
