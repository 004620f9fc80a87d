mod app;
mod config;
mod demo;
mod extractors;
mod handlers;
mod service;
mod state;
mod storage;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, state::AppState};

/// Store credit - per-customer credit balances with an admin API
#[derive(Parser, Debug)]
#[command(name = "storecredit")]
#[command(version, about, long_about = None, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Provision the custom fields and the "Refund as Store Credits" return state
    Install,
    /// Remove the return state and its transitions, and detach the custom fields
    Uninstall,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Seed demo customers, rates and a storefront session
    #[arg(long, env = "SEED_DEMO")]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storecredit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(Config::from_env()).await?;

    match cli.command {
        Some(Command::Serve(args)) => serve(state, args).await,
        None => serve(state, cli.serve).await,
        Some(Command::Install) => install(&state).await,
        Some(Command::Uninstall) => uninstall(&state).await,
    }
}

async fn install(state: &AppState) -> Result<()> {
    let outcome = state.migration.update().await?;
    let report = state.installer.install().await?;
    tracing::info!(
        custom_fields_changed = outcome.changed_anything(),
        state_machine_changed = !report.is_noop(),
        "Install complete"
    );
    Ok(())
}

async fn uninstall(state: &AppState) -> Result<()> {
    let report = state.installer.uninstall().await?;
    let detached = state.migration.detach().await?;
    tracing::info!(
        transitions_removed = report.transitions_removed,
        history_removed = report.history_removed,
        custom_field_relations_removed = detached,
        "Uninstall complete"
    );
    Ok(())
}

async fn serve(state: AppState, args: ServeArgs) -> Result<()> {
    install(&state).await?;

    if args.seed_demo {
        let session = demo::seed_demo(&state).await?;
        tracing::info!(
            cookie = %format!("{}={}", state.config.session_cookie_name, session.id),
            "Demo storefront session ready"
        );
    }

    if state.config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; the admin API will reject every request");
    }

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", args.host, args.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
