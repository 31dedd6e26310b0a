//! Hifier server - Main entry point
//!
//! Music streaming service backend: shared track catalog, playback
//! session control, normalized search, and an SSE stream driving the
//! browser-side player bar.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hifier_common::config::{resolve_setting, FileConfig};
use hifier_server::api::{create_router, AppContext};
use hifier_server::db;
use hifier_server::player::{spawn_transport_bridge, transport_channel, SharedPlayer};
use hifier_server::search::{Debouncer, HttpNormalizer, SearchService, DEFAULT_DEBOUNCE};

/// Command-line arguments for hifier-server
#[derive(Parser, Debug)]
#[command(name = "hifier-server")]
#[command(about = "Hifier music streaming service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HIFIER_PORT")]
    port: Option<u16>,

    /// SQLite database path
    #[arg(short, long, env = "HIFIER_DB")]
    database: Option<PathBuf>,

    /// Query-normalization service endpoint
    #[arg(long, env = "HIFIER_NORMALIZER_URL")]
    normalizer_url: Option<String>,

    /// Optional TOML config file
    #[arg(short, long, env = "HIFIER_CONFIG", default_value = "hifier.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hifier_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments and merge the file layer
    let args = Args::parse();
    let file_config = FileConfig::load(&args.config).context("Failed to load config file")?;

    let port = resolve_setting(args.port, None, file_config.port, 8710);
    let database = resolve_setting(
        args.database,
        None,
        file_config.database_path.map(PathBuf::from),
        PathBuf::from("hifier.db"),
    );
    let normalizer_url = resolve_setting(
        args.normalizer_url,
        None,
        file_config.normalizer_url,
        "http://127.0.0.1:8711/normalize".to_string(),
    );
    let debounce = file_config
        .search_debounce_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DEBOUNCE);

    info!("Starting Hifier server on port {}", port);
    info!("Catalog database: {}", database.display());
    info!("Normalizer endpoint: {}", normalizer_url);

    // Initialize catalog store
    let db_pool = db::create_pool(&database)
        .await
        .context("Failed to open catalog database")?;
    db::init_schema(&db_pool)
        .await
        .context("Failed to initialize catalog schema")?;
    info!("Catalog store initialized");

    // Playback session: one per application instance, passed by Arc
    let player = Arc::new(SharedPlayer::new());
    let (transport_tx, transport_rx) = transport_channel();
    spawn_transport_bridge(Arc::clone(&player), transport_rx);

    // Search flow: debounced normalizer with raw-query fallback
    let normalizer = Arc::new(HttpNormalizer::new(normalizer_url));
    let search = Arc::new(SearchService::new(normalizer));
    let debouncer = Arc::new(Debouncer::new(debounce));

    let ctx = AppContext {
        db_pool,
        player,
        search,
        debouncer,
        transport_tx,
        media_client: reqwest::Client::new(),
    };
    let app = create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
