//! HTTP server assembly for Folk.
//!
//! Wraps the [`folk_api`] router with tracing and timeout layers, loads
//! [`ServerConfig`], and runs the listener with a bounded graceful shutdown.

use std::{
  future::Future,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use folk_core::store::PersonStore;
use serde::Deserialize;
use tokio::{net::TcpListener, sync::watch};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Built once at startup from an optional TOML file overlaid with `FOLK_*`
/// environment variables, then passed by reference to whatever needs it.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub request_timeout_secs: u64,
  pub shutdown_grace_secs:  u64,
}

impl ServerConfig {
  /// Load from `file` (if given and present) and the process environment.
  pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
    Self::load_with(file, config::Environment::with_prefix("FOLK"))
  }

  /// Load from `file` and an explicit environment source.
  pub fn load_with(
    file: Option<&Path>,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080_i64)?
      .set_default("store_path", "folk.db")?
      .set_default("request_timeout_secs", 15_i64)?
      .set_default("shutdown_grace_secs", 15_i64)?;
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    builder
      .add_source(env.try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn shutdown_grace(&self) -> Duration {
    Duration::from_secs(self.shutdown_grace_secs)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: API routes plus per-request tracing
/// and a request timeout.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PersonStore + 'static,
{
  folk_api::api_router(store)
    .layer(TimeoutLayer::new(config.request_timeout()))
    .layer(TraceLayer::new_for_http())
}

// ─── Lifecycle ────────────────────────────────────────────────────────────────

/// Resolves on Ctrl-C, or on SIGTERM where supported.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
    () = terminate => tracing::info!("received SIGTERM, shutting down"),
  }
}

/// Serve `app` until `signal` resolves, then let in-flight requests finish
/// for at most `grace` before returning.
pub async fn serve(
  listener: TcpListener,
  app: Router,
  grace: Duration,
  signal: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
  let (fired_tx, mut fired_rx) = watch::channel(false);

  let server = axum::serve(listener, app).with_graceful_shutdown(async move {
    signal.await;
    let _ = fired_tx.send(true);
  });

  let deadline = async move {
    // An error means the sender is gone, i.e. the server already returned.
    if fired_rx.wait_for(|fired| *fired).await.is_ok() {
      tokio::time::sleep(grace).await;
    } else {
      std::future::pending::<()>().await;
    }
  };

  tokio::select! {
    res = server => res,
    () = deadline => {
      tracing::warn!(?grace, "grace period elapsed with requests still in flight");
      Ok(())
    }
  }
}
