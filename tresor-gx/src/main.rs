//! tresor-gx - gamification service for Trésors
//!
//! Awards points for user activities, tracks levels, grants badges and
//! achievements, and serves leaderboards and activity exports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tresor_common::api::load_shared_secret;
use tresor_common::config::{resolve_root_folder, RootFolderInitializer, TomlConfig};
use tresor_common::db::{get_setting, init_database, DEFAULT_LEADERBOARD_LIMIT};
use tresor_gx::{build_router, AppState};

/// Command-line arguments for tresor-gx
#[derive(Parser, Debug)]
#[command(name = "tresor-gx")]
#[command(about = "Gamification service for Trésors")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "TRESOR_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_path) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind.clone() {
        config.bind_address = bind;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tresor_gx={0},tresor_common={0},tower_http=info", config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Trésors gamification service (tresor-gx) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) => info!("Configuration: {}", path.display()),
        None => warn!("No configuration file found, using defaults"),
    }

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path(&config.database_file);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let shared_secret = load_shared_secret(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load shared secret: {}", e))?;
    if shared_secret == 0 {
        warn!("API authentication disabled (shared_secret = 0)");
    } else {
        info!("✓ Loaded shared secret for API authentication");
    }

    let leaderboard_limit = match get_setting::<i64>(&pool, "leaderboard_default_limit").await {
        Ok(Some(limit)) if limit > 0 => limit,
        Ok(_) => DEFAULT_LEADERBOARD_LIMIT,
        Err(e) => {
            warn!("Ignoring leaderboard_default_limit: {}", e);
            DEFAULT_LEADERBOARD_LIMIT
        }
    };

    let state = AppState::new(pool, shared_secret).with_leaderboard_limit(leaderboard_limit);
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("tresor-gx listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
