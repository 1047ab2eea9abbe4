//! hoop-as - Analysis Service
//!
//! Accepts dribbling clips over HTTP, asks the vision model for feedback, and
//! accumulates it per session until the session saturates and is
//! consolidated into one assessment.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use hoop_as::analysis::{Analyzer, GeminiAnalyzer, StaticAnalyzer};
use hoop_as::config::ServiceConfig;
use hoop_as::{build_router, AppState};

/// Command-line arguments for hoop-as
#[derive(Parser, Debug)]
#[command(name = "hoop-as")]
#[command(about = "Progressive dribbling analysis service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "HOOP_AS_PORT")]
    port: Option<u16>,

    /// Config file (default: <config dir>/hoop-coach/hoop-as.toml)
    #[arg(short, long, env = "HOOP_AS_CONFIG")]
    config: Option<PathBuf>,

    /// Use canned feedback even when an API key is configured
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        "Starting Hoop Coach Analysis Service (hoop-as) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let mut config = match args
        .config
        .clone()
        .or_else(|| hoop_common::config::module_config_path("hoop-as"))
    {
        Some(path) => {
            info!("Config file: {}", path.display());
            ServiceConfig::load(&path).context("Failed to load configuration")?
        }
        None => {
            warn!("No config directory on this platform, using defaults");
            let mut config = ServiceConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate().context("Invalid configuration")?;

    let analyzer = build_analyzer(&config, args.offline)?;
    info!(
        analyzer = analyzer.name(),
        saturation_threshold = config.session.saturation_threshold,
        max_clips = config.session.max_clips_per_session,
        "Analysis configured"
    );

    let state = AppState::new(&config, analyzer);
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("hoop-as listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn build_analyzer(config: &ServiceConfig, offline: bool) -> Result<Arc<dyn Analyzer>> {
    match (&config.gemini.api_key, offline) {
        (Some(key), false) => {
            let analyzer =
                GeminiAnalyzer::new(&config.gemini, key.clone(), config.analysis_timeout())
                    .context("Failed to build Gemini client")?;
            info!(model = %config.gemini.model, "Using Gemini analyzer");
            Ok(Arc::new(analyzer))
        }
        (None, false) => {
            warn!(
                "{} not set; using canned feedback (offline mode)",
                hoop_as::config::API_KEY_ENV
            );
            Ok(Arc::new(StaticAnalyzer::new()))
        }
        (_, true) => {
            info!("Offline mode requested; using canned feedback");
            Ok(Arc::new(StaticAnalyzer::new()))
        }
    }
}

/// Graceful shutdown signal handler
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
