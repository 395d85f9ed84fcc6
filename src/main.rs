use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{prelude::*, reload, EnvFilter};

use scribe::api::{self, AppState};
use scribe::config::{self, Config};
use scribe::storage::{Database, DatabaseError};

#[derive(Parser, Debug)]
#[command(name = "scribe", about = "Blog article CRUD API backed by SQLite")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, value_name = "FILE", default_value = "scribe.toml")]
    config: PathBuf,

    /// Delete all articles and restart ids before serving
    #[arg(long)]
    reset_db: bool,

    /// Port to listen on (overrides config and APP_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before tracing init so RUST_LOG may come from `.env`; the outcome is
    // logged once the subscriber exists.
    let dotenv = config::load_dotenv(Path::new(".env"));

    // RUST_LOG wins; otherwise start at info and drop to debug once the
    // config has been read.
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, filter_handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match dotenv {
        Ok(true) => tracing::debug!("Loaded .env"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }

    let mut config = Config::load(&args.config).context("Failed to load configuration")?;
    config
        .apply_env(|name| std::env::var(name).ok())
        .context("Invalid environment configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    if config.debug && !rust_log_set {
        if let Err(e) = filter_handle.reload(EnvFilter::new("debug")) {
            tracing::warn!(error = %e, "Failed to switch log level to debug");
        }
    }
    tracing::debug!(?config, "Effective configuration");

    let db = match Database::open(&config.database_path).await {
        Ok(db) => db,
        Err(DatabaseError::Locked) => {
            eprintln!(
                "Error: The database at {} is locked by another process. Please close it and try again.",
                config.database_path
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    if args.reset_db {
        let removed = db.reset().await.context("Failed to reset database")?;
        println!("Database reset: {} articles removed.", removed);
    }

    let app = api::router(AppState::new(db));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(app = %config.app_name, addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl-C or SIGTERM on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for Ctrl-C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
