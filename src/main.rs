use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::signal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mindcare::chat::ChatClient;
use mindcare::config::MindcareConfig;
use mindcare::http::{AppState, HttpServer};
use mindcare::ratelimit::RateLimiter;

#[derive(Parser, Debug)]
#[command(name = "mindcare")]
#[command(about = "Backend API service for the MindCare wellness companion")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    info!("Starting MindCare API service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => MindcareConfig::from_file(path)?,
        None => MindcareConfig::default(),
    };
    info!(http_addr = %config.server.http_addr, "Configuration loaded");

    // Initialize the admission limiter
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limiting.max_requests,
        config.rate_limiting.window(),
    ));
    info!(
        max_requests = config.rate_limiting.max_requests,
        window_secs = config.rate_limiting.window_secs,
        "Rate limiter initialized"
    );

    spawn_bucket_sweeper(Arc::clone(&limiter), config.rate_limiting.sweep_interval());

    // Build shared state and start the HTTP server
    let chat = Arc::new(ChatClient::new(config.chat.clone()));
    let state = AppState { limiter, chat };

    let server = HttpServer::new(config.server.http_addr, state);
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("MindCare API service stopped");
    Ok(())
}

/// Periodically drop rate limit buckets whose window has passed.
fn spawn_bucket_sweeper(limiter: Arc<RateLimiter>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = limiter.sweep_expired(Instant::now());
            if removed > 0 {
                debug!(
                    removed,
                    live = limiter.bucket_count(),
                    "Swept expired rate limit buckets"
                );
            }
        }
    });
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
