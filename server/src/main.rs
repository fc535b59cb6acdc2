use anyhow::{anyhow, Result};
use axum::Router;
use clap::Parser;
use hybrid_client::{ClientConfig, ControlClient, EmbedClient, IndexHandle};
use hybrid_server::{build_app, Backend};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Fitted encoder state directory
    #[arg(long, default_value = "./state")]
    state: String,
    /// Hosted index name; /search is disabled when omitted
    #[arg(long)]
    index: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let backend = match &args.index {
        Some(name) => {
            let config = ClientConfig::from_env()?;
            let control = ControlClient::new(config.clone())?;
            let desc = control
                .describe_index(name)
                .await?
                .ok_or_else(|| anyhow!("index {name} does not exist"))?;
            tracing::info!(index = %name, host = %desc.host, "connected to index");
            Some(Backend {
                embed: EmbedClient::new(config.clone())?,
                index: IndexHandle::new(&config, &desc.host)?,
            })
        }
        None => {
            tracing::warn!("no --index given; /search will answer 503");
            None
        }
    };

    let app: Router = build_app(&args.state, backend)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
