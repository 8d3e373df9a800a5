//! Media server daemon.
//!
//! # Usage
//!
//! ```bash
//! MEDIASERVER_PASSWORD=secret mediaserver --root ~/Pictures
//! mediaserver --config mediaserver.json --port 8080
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mediaserver::{Server, ServerConfig, ServerResult};

const DEFAULT_LOG_FILTER: &str = "mediaserver=info,media_index=info,tower_http=info";

/// Personal media index and file server
#[derive(Parser, Debug)]
#[command(name = "mediaserver")]
#[command(about = "Index a media directory and serve it over an authenticated HTTP API")]
#[command(version)]
struct Args {
    /// JSON config file; its values sit between defaults and the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Media directory to index and serve
    #[arg(long)]
    root: Option<PathBuf>,

    /// Location of the persisted index
    #[arg(long)]
    index_file: Option<PathBuf>,

    /// Directory with the web front-end
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(root) = self.root {
            config.media_root = root;
        }
        if let Some(index_file) = self.index_file {
            config.index_file = index_file;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = static_dir;
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();
    if let Err(error) = run(args).await {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> ServerResult<()> {
    let mut config = match args.config.as_deref() {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env()?;
    args.apply(&mut config);

    let server = Server::start(&config).await?;
    tracing::info!("media server listening on http://{}", server.addr());

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.stop().await;
    Ok(())
}
