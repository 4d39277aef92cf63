//! HTTP server binary for `labeled_todos`.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY`: enables label suggestions when set
//! - `OPENAI_MODEL`, `OPENAI_BASE_URL`: completion model and endpoint
//! - `TODO_DATABASE_PATH`, `TODO_BIND_ADDRESS`, `TODO_CORS_ORIGINS`
//! - `RUST_LOG`: log filter (default `labeled_todos=info,tower_http=info`)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use labeled_todos::api::{self, AppState};
use labeled_todos::config::ServiceConfig;
use labeled_todos::labels::LabelClient;
use labeled_todos::tasks::{SqliteTaskStore, TaskService};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(version, about = "Task-tracking HTTP service with LLM labels")]
struct Args {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000 (or set `TODO_BIND_ADDRESS`)
    #[arg(long, env = "TODO_BIND_ADDRESS")]
    bind: Option<String>,

    /// `SQLite` database file (or set `TODO_DATABASE_PATH`)
    #[arg(long, env = "TODO_DATABASE_PATH")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labeled_todos=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> labeled_todos::Result<()> {
    let mut config = ServiceConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    let address = config.socket_addr()?;
    tracing::info!(
        database = %config.database_path.display(),
        model = %config.labeler.model,
        "configuration loaded"
    );

    let store = SqliteTaskStore::new(&config.database_path)?;

    let labels = LabelClient::from_config(&config.labeler)?;
    if labels.is_configured() {
        tracing::info!(model = %config.labeler.model, "label suggestions enabled");
    } else {
        tracing::warn!("OPENAI_API_KEY not set; label suggestions disabled");
    }

    let state = AppState::new(TaskService::new(store, labels));
    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(api::cors_layer(&config.cors_origins));

    let listener = TcpListener::bind(address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Completes on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
