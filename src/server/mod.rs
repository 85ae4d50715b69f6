mod assets;
mod config;
mod host;
mod http;
mod spa;

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use self::{config::ServerConfig, host::SpaHost};

pub async fn serve() -> Result<()> {
  let config = ServerConfig::from_env()?;
  init_tracing(config.json_logs);
  if let Some(addr) = config.metrics_bind {
    PrometheusBuilder::new()
      .with_http_listener(addr)
      .install()
      .context("Failed to install Prometheus exporter")?;
  }
  let host = SpaHost::new(config.apps)?;
  host.check_assets().await?;
  http::http_server_task(config.bind, Arc::new(host)).await
}

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  if json {
    tracing_subscriber::fmt().json().with_env_filter(filter).init();
  } else {
    tracing_subscriber::fmt().with_env_filter(filter).init();
  }
}
