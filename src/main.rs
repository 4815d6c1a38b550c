//! App Skeleton - Application shell around a fault-tolerant cache client
//!
//! Runs the health probe server, checks cache readiness, or dispatches a job.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_skeleton::api::create_router;
use app_skeleton::jobs::parse_options;
use app_skeleton::{spawn_readiness_task, AppState, Config, JobRegistry};

#[derive(Parser)]
#[command(name = "app_skeleton")]
#[command(about = "Application skeleton with a Redis-backed cache", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the health probe and keep the cache connection alive
    Serve,

    /// Probe the cache store once and exit non-zero when it is unusable
    Ready,

    /// Run a job by name
    Job {
        /// Registered job name (e.g. hello-world)
        name: String,

        /// Subcommand passed to the job
        #[arg(default_value = "")]
        subcommand: String,

        /// Job option as key=value, repeatable
        #[arg(short, long = "option")]
        options: Vec<String>,

        /// Job flag, repeatable
        #[arg(short, long = "flag")]
        flags: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let default_filter = if cli.verbose {
        "app_skeleton=debug,tower_http=debug"
    } else {
        "app_skeleton=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: environment={:?}, cache={}:{}, port={}, ready_check_interval={}s",
        config.environment,
        config.cache.host,
        config.cache.port,
        config.server_port,
        config.ready_check_interval
    );

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Ready => {
            let state = AppState::from_config(&config).await;
            let ready = state.cache.ready().await;
            state.cache.close().await;

            if ready {
                println!("cache ready");
                Ok(())
            } else {
                println!("cache not ready");
                std::process::exit(1);
            }
        }
        Commands::Job {
            name,
            subcommand,
            options,
            flags,
        } => {
            let registry = JobRegistry::with_defaults();
            let response = registry
                .dispatch(&name, &subcommand, &parse_options(&options), &flags)
                .with_context(|| format!("available jobs: {}", registry.names().join(", ")))?;

            println!("{}", response.body);
            if response.exit_code != 0 {
                std::process::exit(response.exit_code);
            }
            Ok(())
        }
    }
}

/// Serves `/health` until Ctrl+C or SIGTERM.
///
/// # Startup Sequence
/// 1. Connect the cache client (a down store is tolerated)
/// 2. Start the background readiness task
/// 3. Bind the probe server on the configured port
/// 4. On shutdown, abort the task and close the cache connection
async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config).await;
    if !state.cache.ready().await {
        warn!("Cache store not ready at startup, continuing in degraded mode");
    }

    let readiness_handle = spawn_readiness_task(state.cache.clone(), config.ready_check_interval);
    info!("Background readiness task started");

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_handle))
        .await
        .context("server error")?;

    cache.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the readiness task and allows graceful shutdown.
async fn shutdown_signal(readiness_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    readiness_handle.abort();
    warn!("Readiness task aborted");
}
