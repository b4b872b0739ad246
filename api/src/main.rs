use anyhow::Context;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;
use turnstile_api::{config::TurnstileConfig, context::ApiContext, server};

const DEFAULT_LOG_FILTER: &str = "turnstile_api=info,turnstile_db=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TurnstileConfig::parse();

    if config.dump_openapi {
        print!("{}", server::openapi().to_pretty_json()?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .pretty()
        .init();

    let context = ApiContext::from_config(&config).await?;
    let (router, _api) = server::make(context);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
