//! Routinely CLI and REST API entry point.
//!
//! Binary name: `routinely`
//!
//! Parses CLI arguments, initializes storage and the chat session, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = routinely_observe::default_filter(cli.verbose, cli.quiet);
    routinely_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    routinely_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "routinely", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.overrides()).await?;
    let json = cli.json;

    match cli.command {
        Commands::Products {
            category,
            search,
            expand,
        } => {
            cli::products::list_products(&state, category, search, expand, json).await?;
        }

        Commands::Categories => {
            cli::products::list_categories(&state, json).await?;
        }

        Commands::Toggle { name } => {
            cli::selection::toggle(&state, &name, json).await?;
        }

        Commands::Remove { name } => {
            cli::selection::remove(&state, &name, json).await?;
        }

        Commands::Clear { force } => {
            cli::selection::clear(&state, force, json).await?;
        }

        Commands::Selection => {
            cli::selection::show(&state, json).await?;
        }

        Commands::Routine => {
            cli::chat::run_routine(&state, json).await?;
        }

        Commands::Serve { port, host } => {
            tracing::info!(
                data_dir = %state.data_dir.display(),
                catalog = %state.config.catalog,
                endpoint = %state.config.chat_endpoint,
                model = %state.config.model,
                "starting server"
            );
            match state.load_catalog().await {
                Ok(count) => tracing::info!(count, "catalog ready"),
                Err(err) => tracing::warn!("{err:#}; serving an empty catalog until reloaded"),
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} Routinely API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
