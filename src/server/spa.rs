use std::borrow::Cow;

use axum::http::{header::ACCEPT, HeaderMap, HeaderValue};
use mime_guess::mime::{self, Mime};
use regex::Regex;
use tracing::debug;

/// Cache-Control for the index page, which must never be served stale.
pub const NO_CACHE: &str = "must-revalidate, no-cache, no-store";

pub fn trailing_slash(path: &str) -> Cow<'_, str> {
  if path.ends_with('/') {
    Cow::Borrowed(path)
  } else {
    Cow::Owned(format!("{path}/"))
  }
}

/// The mapping root itself, which implicitly serves the index page.
pub fn is_root_page(current_path: &str, root_path: &str) -> bool {
  trailing_slash(current_path) == root_path
}

/// Only an explicit `text/html` with a non-zero quality counts. Browsers send
/// `*/*` for fonts and scripts, which must not receive the index page.
pub fn is_html_request(headers: &HeaderMap) -> bool {
  headers
    .get_all(ACCEPT)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .flat_map(|value| value.split(','))
    .any(|item| match item.trim().parse::<Mime>() {
      Ok(media) => media.essence_str() == mime::TEXT_HTML.essence_str() && !is_refused(&media),
      Err(err) => {
        debug!("failed to parse media type '{item}': {err}");
        false
      }
    })
}

/// `q=0` marks a type the client does not accept.
fn is_refused(media: &Mime) -> bool {
  media
    .get_param("q")
    .and_then(|q| q.as_str().parse::<f32>().ok())
    .map_or(false, |q| q <= 0.0)
}

/// Whether a missing resource could be a client-side route.
pub fn is_spa_route(headers: &HeaderMap, path: &str, no_redirect: &Regex) -> bool {
  is_html_request(headers) && !no_redirect.is_match(path)
}

pub fn no_cache() -> HeaderValue {
  HeaderValue::from_static(NO_CACHE)
}
