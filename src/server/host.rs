use anyhow::{ensure, Context, Result};

use super::{config::SpaConfig, spa::trailing_slash};

/// The SPAs served by one server, each owning a distinct URI prefix.
#[derive(Debug, Clone)]
pub struct SpaHost {
  apps: Vec<SpaConfig>,
}

impl SpaHost {
  pub fn new(apps: Vec<SpaConfig>) -> Result<Self> {
    ensure!(!apps.is_empty(), "No SPA configured");
    for (i, app) in apps.iter().enumerate() {
      for other in &apps[..i] {
        ensure!(
          other.name != app.name,
          "SPA name '{}' is registered twice",
          app.name
        );
        ensure!(
          !overlaps(&other.uri_path, &app.uri_path),
          "SPA '{}' on '{}*' clashes with SPA '{}' on '{}*'",
          app.name,
          app.uri_path,
          other.name,
          other.uri_path
        );
      }
    }
    Ok(SpaHost { apps })
  }

  pub fn apps(&self) -> &[SpaConfig] {
    &self.apps
  }

  /// The app mapped on `path` and the path below its prefix.
  pub fn find<'a>(&self, path: &'a str) -> Option<(&SpaConfig, &'a str)> {
    self
      .apps
      .iter()
      .find_map(|app| relative_path(path, &app.uri_path).map(|relative| (app, relative)))
  }

  pub async fn check_assets(&self) -> Result<()> {
    for app in &self.apps {
      app
        .assets
        .check_index(&app.index_file)
        .await
        .with_context(|| format!("SPA '{}'", app.name))?;
    }
    Ok(())
  }
}

fn overlaps(a: &str, b: &str) -> bool {
  a.starts_with(b) || b.starts_with(a)
}

/// Path below the mapping prefix, `""` for the mapping root.
fn relative_path<'a>(path: &'a str, uri_path: &str) -> Option<&'a str> {
  if trailing_slash(path) == uri_path {
    return Some("");
  }
  path.strip_prefix(uri_path)
}
