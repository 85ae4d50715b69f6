use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::assets::AssetRoot;

/// Paths that look like static files are never answered with the index page.
/// An optional version marker (`?v=12`) is allowed after the extension.
pub const DEFAULT_NO_REDIRECT: &str = r"\.(html|css|js|png|jpg|jpeg|gif|ico|xml|rss|txt|eot|svg|ttf|woff|woff2|cur)(\?((r|v|rel|rev)=[\-\.\w]*)?)?$";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_APP: &str = "app";

lazy_static! {
  static ref DEFAULT_NO_REDIRECT_REGEX: Regex = Regex::new(DEFAULT_NO_REDIRECT).unwrap();
}

#[derive(Debug, Clone)]
pub struct SpaConfig {
  pub name: String,
  /// Mapping prefix, always with leading and trailing slash.
  pub uri_path: String,
  pub index_file: String,
  pub no_redirect: Regex,
  pub assets: AssetRoot,
}

impl Default for SpaConfig {
  fn default() -> Self {
    SpaConfig::new(DEFAULT_APP, "/")
  }
}

impl SpaConfig {
  pub fn new(name: &str, uri_path: &str) -> Self {
    SpaConfig {
      name: name.to_string(),
      uri_path: normalize_uri_path(uri_path),
      index_file: "index.html".to_string(),
      no_redirect: DEFAULT_NO_REDIRECT_REGEX.clone(),
      assets: AssetRoot::Embedded,
    }
  }

  pub fn index_page(mut self, name: &str) -> Self {
    self.index_file = name.trim_start_matches('/').to_string();
    self
  }

  /// The regex is applied with find, anchor it with `^`/`$` where needed.
  pub fn prevent_redirect_regex(mut self, regex: &str) -> Result<Self> {
    self.no_redirect =
      Regex::new(regex).with_context(|| format!("Invalid no-redirect regex: {regex}"))?;
    Ok(self)
  }

  pub fn assets(mut self, assets: AssetRoot) -> Self {
    self.assets = assets;
    self
  }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind: SocketAddr,
  pub metrics_bind: Option<SocketAddr>,
  pub json_logs: bool,
  pub apps: Vec<SpaConfig>,
}

impl ServerConfig {
  pub fn from_env() -> Result<Self> {
    Self::from_vars(|key| env::var(key).ok())
  }

  /// `SPA_APPS=shop,admin` declares several apps configured by
  /// `SPA_SHOP_URI_PATH`, `SPA_SHOP_INDEX`, ...; without it a single app is
  /// read from `SPA_URI_PATH`, `SPA_INDEX`, `SPA_NO_REDIRECT` and `SPA_ROOT`.
  pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let bind = var("SPA_BIND")
      .unwrap_or_else(|| DEFAULT_BIND.to_string())
      .parse()
      .context("SPA_BIND is not a socket address")?;
    let metrics_bind = var("METRICS_BIND")
      .map(|addr| addr.parse::<SocketAddr>())
      .transpose()
      .context("METRICS_BIND is not a socket address")?;
    let json_logs = var("LOG_FORMAT").map_or(false, |format| format.eq_ignore_ascii_case("json"));

    let apps = match var("SPA_APPS") {
      Some(names) => names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
          let prefix = format!("SPA_{}_", name.to_ascii_uppercase().replace('-', "_"));
          spa_from_vars(name, |key| var(&format!("{prefix}{key}")))
        })
        .collect::<Result<Vec<_>>>()?,
      None => vec![spa_from_vars(DEFAULT_APP, |key| var(&format!("SPA_{key}")))?],
    };
    Ok(ServerConfig {
      bind,
      metrics_bind,
      json_logs,
      apps,
    })
  }
}

fn spa_from_vars(name: &str, var: impl Fn(&str) -> Option<String>) -> Result<SpaConfig> {
  let mut spa = SpaConfig::new(name, &var("URI_PATH").unwrap_or_default());
  if let Some(index) = var("INDEX") {
    spa = spa.index_page(&index);
  }
  if let Some(regex) = var("NO_REDIRECT") {
    spa = spa
      .prevent_redirect_regex(&regex)
      .with_context(|| format!("SPA '{name}'"))?;
  }
  if let Some(root) = var("ROOT") {
    spa = spa.assets(AssetRoot::Directory(PathBuf::from(root)));
  }
  Ok(spa)
}

fn normalize_uri_path(path: &str) -> String {
  let path = path.trim().trim_matches('/');
  if path.is_empty() {
    "/".to_string()
  } else {
    format!("/{path}/")
  }
}
