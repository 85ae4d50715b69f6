use std::{
  borrow::Cow,
  io::ErrorKind,
  path::{Component, Path, PathBuf},
};

use anyhow::{ensure, Result};
use include_dir::{include_dir, Dir};
use mime_guess::mime::Mime;
use tracing::warn;

/// `static/`, including the wasm-pack output in `static/pkg` when it was built
/// before this crate.
static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

/// Where an SPA's files come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetRoot {
  #[default]
  Embedded,
  Directory(PathBuf),
}

pub struct Asset {
  pub path: String,
  pub contents: Cow<'static, [u8]>,
}

impl Asset {
  pub fn mime_type(&self) -> Mime {
    mime_guess::from_path(&self.path).first_or_octet_stream()
  }
}

impl AssetRoot {
  pub async fn get(&self, path: &str) -> Option<Asset> {
    match self {
      AssetRoot::Embedded => ASSETS.get_file(path).map(|file| Asset {
        path: path.to_string(),
        contents: Cow::Borrowed(file.contents()),
      }),
      AssetRoot::Directory(root) => {
        let relative = Path::new(path);
        if !relative
          .components()
          .all(|component| matches!(component, Component::Normal(_)))
        {
          return None;
        }
        match tokio::fs::read(root.join(relative)).await {
          Ok(contents) => Some(Asset {
            path: path.to_string(),
            contents: Cow::Owned(contents),
          }),
          Err(err) => {
            if err.kind() != ErrorKind::NotFound {
              warn!("Failed to read {}: {err}", root.join(relative).display());
            }
            None
          }
        }
      }
    }
  }

  pub async fn check_index(&self, index_file: &str) -> Result<()> {
    ensure!(
      self.get(index_file).await.is_some(),
      "Index file {index_file} not found in {:?}",
      self
    );
    Ok(())
  }
}

#[cfg(test)]
pub fn fixture() -> AssetRoot {
  AssetRoot::Directory(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop"))
}
