//! Zeny CLI and REST API entry point.
//!
//! Binary name: `zeny`
//!
//! Parses CLI arguments, opens the store, bootstraps the admin account and
//! either exits (`bootstrap`) or serves the REST API (`serve`).

mod cli;
mod http;
mod state;
mod telemetry;

use clap::Parser;
use zeny_core::auth::identity::BootstrapOutcome;
use zeny_types::config::LogFormat;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Settings decide the log format, so their own warnings go to a
    // temporary stderr subscriber.
    let settings = {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .finish(),
        );
        zeny_infra::config::load_settings(cli.command.service().config.as_deref()).await
    };

    let format = cli
        .log_format
        .map(LogFormat::from)
        .unwrap_or(settings.logging.format);
    telemetry::init_tracing(cli.verbose, cli.quiet, format)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            service,
        } => {
            let host = host.unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            let config = service.into_config(settings);

            let (state, outcome) = AppState::init(&config).await?;
            if !cli.quiet {
                report_bootstrap(&outcome);
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "Listening");

            if !cli.quiet {
                println!(
                    "  {} Zeny API listening on {}",
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

        Commands::Bootstrap { service } => {
            let config = service.into_config(settings);
            let (_state, outcome) = AppState::init(&config).await?;
            if !cli.quiet {
                report_bootstrap(&outcome);
            }
        }
    }

    Ok(())
}

fn report_bootstrap(outcome: &BootstrapOutcome) {
    match outcome {
        BootstrapOutcome::Created { username } => println!(
            "  {} Created admin account {}",
            console::style("✓").green().bold(),
            console::style(username).cyan()
        ),
        BootstrapOutcome::AlreadyPresent { username } => println!(
            "  {} Admin account {} already present",
            console::style("•").dim(),
            console::style(username).cyan()
        ),
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutting down");
}
