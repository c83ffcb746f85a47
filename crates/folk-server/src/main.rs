//! folk-server binary.
//!
//! Reads configuration (an optional TOML file given with `--config`, overlaid
//! with `FOLK_*` environment variables), opens the SQLite store, and serves
//! the person API over HTTP until interrupted.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use folk_server::{ServerConfig, expand_tilde};
use folk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Folk person service")]
struct Cli {
  /// Path to an optional TOML configuration file.
  #[arg(short, long)]
  config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(cli.config.as_deref())
    .context("failed to load configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let app = folk_server::app(Arc::new(store), &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  folk_server::serve(
    listener,
    app,
    server_cfg.shutdown_grace(),
    folk_server::shutdown_signal(),
  )
  .await
  .context("server error")?;

  tracing::info!("Server gracefully stopped");
  Ok(())
}
