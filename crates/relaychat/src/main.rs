use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relaychat::config::{Config, ENV_API_KEY};
use relaychat::llm::OpenAICompatibleProvider;
use relaychat::relay::Relay;
use relaychat::repl;
use relaychat::server::{AppState, build_app};

#[derive(Parser)]
#[command(name = "relaychat", version, about = "Minimal chat relay for OpenAI-compatible APIs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the relay server and the browser chat page
    Serve {
        /// Path to the YAML config file (missing file means defaults)
        #[arg(short, long, default_value = "relaychat.yaml")]
        config: PathBuf,
        /// Override the listen host
        #[arg(long)]
        host: Option<String>,
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat with a running relay from the terminal
    Chat {
        /// Base URL of the relay server
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => {
            init_tracing();
            serve(config, host, port).await
        }
        Command::Chat { url } => repl::run(&url).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaychat=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config_path: PathBuf, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::resolve(&config_path).await?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    if config.upstream.api_key.is_none() {
        warn!("{ENV_API_KEY} is not set; upstream requests will fail authentication");
    }

    let provider = OpenAICompatibleProvider::from_config(&config.upstream)?;
    let relay = Relay::new(Arc::new(provider), config.upstream.model.clone());
    let app = build_app(AppState { relay }, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        model = %config.upstream.model,
        upstream = %config.upstream.base_url,
        "relaychat listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relaychat stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
