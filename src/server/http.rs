use std::{borrow::Cow, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
  extract::State,
  http::{header, HeaderMap, Method, StatusCode, Uri},
  response::{IntoResponse, Response},
  Router,
};
use headers::{ContentType, HeaderMapExt};
use metrics::increment_counter;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use super::{
  assets::Asset,
  config::SpaConfig,
  host::SpaHost,
  spa::{is_root_page, is_spa_route, no_cache},
};

pub fn router(host: Arc<SpaHost>) -> Router {
  Router::new()
    .fallback(serve_spa)
    .with_state(host)
    .layer(TraceLayer::new_for_http())
}

async fn serve_spa(
  State(host): State<Arc<SpaHost>>,
  method: Method,
  uri: Uri,
  headers: HeaderMap,
) -> Response {
  if method != Method::GET && method != Method::HEAD {
    return StatusCode::METHOD_NOT_ALLOWED.into_response();
  }
  let path = uri.path();
  let Some((app, relative)) = host.find(path) else {
    debug!("Not found: {path}");
    increment_counter!("spa_not_found_total");
    return StatusCode::NOT_FOUND.into_response();
  };
  let asset_path = if relative.is_empty() || relative.ends_with('/') {
    format!("{relative}{}", app.index_file)
  } else {
    relative.to_string()
  };

  if let Some(asset) = app.assets.get(&asset_path).await {
    increment_counter!("spa_assets_served_total", "app" => app.name.clone());
    return if asset_path == app.index_file {
      index_response(app, asset)
    } else {
      let is_index = is_index_file(&asset_path, &app.index_file);
      asset_response(asset, is_index)
    };
  }

  if !is_root_page(path, &app.uri_path) && is_spa_route(&headers, path, &app.no_redirect) {
    debug!("SPA route {path} => {}{}", app.uri_path, app.index_file);
    increment_counter!("spa_route_redirects_total", "app" => app.name.clone());
    return match app.assets.get(&app.index_file).await {
      Some(index) => index_response(app, index),
      None => {
        error!("Index file {} of SPA '{}' is missing", app.index_file, app.name);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
      }
    };
  }
  debug!("Not found: {path}");
  increment_counter!("spa_not_found_total", "app" => app.name.clone());
  StatusCode::NOT_FOUND.into_response()
}

/// Index pages in subdirectories are no more cacheable than the root one.
fn is_index_file(asset_path: &str, index_file: &str) -> bool {
  asset_path == index_file
    || asset_path
      .strip_suffix(index_file)
      .map_or(false, |dir| dir.ends_with('/'))
}

/// The app's index page, with a `<base>` pointing at its prefix so relative
/// URLs resolve the same on every client route.
fn index_response(app: &SpaConfig, index: Asset) -> Response {
  let base = format!("<base href=\"{}\" />", app.uri_path);
  let Asset { path, contents } = index;
  let rewritten = std::str::from_utf8(&contents)
    .ok()
    .filter(|html| html.contains("<head>") && !html.contains("<base "))
    .map(|html| html.replacen("<head>", &format!("<head>\n    {base}"), 1));
  let contents = match rewritten {
    Some(html) => Cow::Owned(html.into_bytes()),
    None => contents,
  };
  asset_response(Asset { path, contents }, true)
}

fn asset_response(asset: Asset, is_index: bool) -> Response {
  let content_type = ContentType::from(asset.mime_type());
  let mut response = asset.contents.into_owned().into_response();
  let headers = response.headers_mut();
  headers.typed_insert(content_type);
  if is_index {
    headers.insert(header::CACHE_CONTROL, no_cache());
  }
  response
}

pub async fn http_server_task(addr: SocketAddr, host: Arc<SpaHost>) -> Result<()> {
  for app in host.apps() {
    info!(
      "SPA '{}' for {:?} registered on uri '{}*' with index '{}'",
      app.name, app.assets, app.uri_path, app.index_file
    );
  }
  info!("Listening on {addr}");
  axum::Server::try_bind(&addr)
    .with_context(|| format!("Failed to bind {addr}"))?
    .serve(router(host).into_make_service())
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(err) = tokio::signal::ctrl_c().await {
    error!("Failed to listen for shutdown signal: {err}");
    return;
  }
  info!("Shutting down");
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request};
  use tower::ServiceExt;

  use super::*;
  use crate::server::{assets::fixture, spa::NO_CACHE};

  const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,*/*;q=0.8";

  fn host(apps: Vec<SpaConfig>) -> Arc<SpaHost> {
    Arc::new(SpaHost::new(apps).unwrap())
  }

  async fn get(host: Arc<SpaHost>, uri: &str, accept: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(accept) = accept {
      request = request.header(header::ACCEPT, accept);
    }
    router(host)
      .oneshot(request.body(Body::empty()).unwrap())
      .await
      .unwrap()
  }

  async fn body(response: Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn cache_control(response: &Response) -> Option<&str> {
    response
      .headers()
      .get(header::CACHE_CONTROL)
      .and_then(|value| value.to_str().ok())
  }

  fn content_type(response: &Response) -> &str {
    response.headers()[header::CONTENT_TYPE].to_str().unwrap()
  }

  fn shop() -> SpaConfig {
    SpaConfig::new("shop", "/shop").assets(fixture())
  }

  #[tokio::test]
  async fn root_serves_index_without_caching() {
    let response = get(host(vec![SpaConfig::default()]), "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html");
    assert_eq!(cache_control(&response), Some(NO_CACHE));
    let html = body(response).await;
    assert!(html.contains("<div id=\"app\"></div>"));
    assert!(html.contains("<base href=\"/\" />"));
  }

  #[tokio::test]
  async fn index_file_is_not_cached() {
    let response = get(host(vec![SpaConfig::default()]), "/index.html", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_control(&response), Some(NO_CACHE));
  }

  #[tokio::test]
  async fn client_routes_get_index() {
    for route in ["/foo", "/bar", "/baz/qux"] {
      let response = get(host(vec![SpaConfig::default()]), route, Some(BROWSER_ACCEPT)).await;
      assert_eq!(response.status(), StatusCode::OK, "{route}");
      assert_eq!(cache_control(&response), Some(NO_CACHE));
      assert!(body(response).await.contains("<div id=\"app\"></div>"));
    }
  }

  #[tokio::test]
  async fn refused_html_is_not_redirected() {
    let accept = Some("text/html;q=0, application/json");
    let response = get(host(vec![SpaConfig::default()]), "/foo", accept).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn non_html_requests_are_not_redirected() {
    let response = get(host(vec![SpaConfig::default()]), "/foo", Some("*/*")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(host(vec![SpaConfig::default()]), "/foo", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn missing_static_files_are_not_redirected() {
    let response = get(host(vec![shop()]), "/shop/pkg/missing.js", Some(BROWSER_ACCEPT)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(cache_control(&response).is_none());
  }

  #[tokio::test]
  async fn bundle_is_served_with_javascript_type() {
    let response = get(host(vec![shop()]), "/shop/pkg/shop.js", Some("*/*")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).ends_with("/javascript"));
    assert!(cache_control(&response).is_none());
    assert!(body(response).await.contains("export default function init"));
  }

  #[tokio::test]
  async fn custom_no_redirect_pattern() {
    let config = SpaConfig::default().prevent_redirect_regex("^/api/").unwrap();
    let response = get(host(vec![config.clone()]), "/api/users", Some(BROWSER_ACCEPT)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(host(vec![config]), "/foo", Some(BROWSER_ACCEPT)).await;
    assert_eq!(response.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn prefixed_mapping() {
    let host = host(vec![SpaConfig::new("app", "/app")]);
    for uri in ["/app", "/app/", "/app/index.html", "/app/foo"] {
      let response = get(host.clone(), uri, Some(BROWSER_ACCEPT)).await;
      assert_eq!(response.status(), StatusCode::OK, "{uri}");
      assert!(body(response).await.contains("<base href=\"/app/\" />"));
    }
    for uri in ["/", "/foo", "/application"] {
      let response = get(host.clone(), uri, Some(BROWSER_ACCEPT)).await;
      assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
  }

  #[tokio::test]
  async fn several_apps_route_by_prefix() {
    let host = host(vec![shop(), SpaConfig::new("admin", "/admin")]);

    let response = get(host.clone(), "/shop/cart", Some(BROWSER_ACCEPT)).await;
    let html = body(response).await;
    assert!(html.contains("<title>shop</title>"));
    assert!(html.contains("<base href=\"/shop/\" />"));

    let response = get(host.clone(), "/admin/users", Some(BROWSER_ACCEPT)).await;
    let html = body(response).await;
    assert!(html.contains("<title>spa-routes</title>"));
    assert!(html.contains("<base href=\"/admin/\" />"));

    let response = get(host, "/elsewhere", Some(BROWSER_ACCEPT)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn subdirectory_index_is_not_cached() {
    let host = host(vec![shop()]);
    for uri in ["/shop/sub/", "/shop/sub/index.html"] {
      let response = get(host.clone(), uri, None).await;
      assert_eq!(response.status(), StatusCode::OK, "{uri}");
      assert_eq!(cache_control(&response), Some(NO_CACHE), "{uri}");
      assert!(body(response).await.contains("<title>shop section</title>"));
    }
  }

  #[tokio::test]
  async fn only_reads_are_allowed() {
    let request = Request::builder()
      .method(Method::POST)
      .uri("/foo")
      .body(Body::empty())
      .unwrap();
    let response = router(host(vec![SpaConfig::default()]))
      .oneshot(request)
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
  }

  #[test]
  fn index_file_detection() {
    assert!(is_index_file("index.html", "index.html"));
    assert!(is_index_file("sub/index.html", "index.html"));
    assert!(!is_index_file("myindex.html", "index.html"));
    assert!(!is_index_file("app.js", "index.html"));
  }
}
