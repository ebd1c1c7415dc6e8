use crate::utils::headers::{content_disposition, DispositionType};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use percent_encoding::percent_decode_str;
use std::path::Path;
use tower_http::services::ServeDir;

/// Name a mounted file is offered under. Paths ending in `/` resolve to the
/// directory index.
pub fn served_file_name(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() {
        return "index.html".to_string();
    }
    percent_decode_str(last).decode_utf8_lossy().into_owned()
}

async fn set_disposition(
    State(kind): State<DispositionType>,
    req: Request,
    next: Next,
) -> Response {
    let file_name = served_file_name(req.uri().path());
    let mut response = next.run(req).await;

    if response.status().is_success() {
        match HeaderValue::from_str(&content_disposition(kind, &file_name)) {
            Ok(value) => {
                response.headers_mut().insert(CONTENT_DISPOSITION, value);
            }
            Err(e) => tracing::warn!("⚠️ No Content-Disposition for '{}': {}", file_name, e),
        }
    }
    response
}

/// Serves files under `root`, with range and conditional requests, each
/// tagged with a `Content-Disposition` of `kind`. Paths escaping `root` are
/// answered 404 by `ServeDir`.
pub fn mount(root: impl AsRef<Path>, kind: DispositionType) -> Router {
    tracing::debug!("Mounting {} as {:?}", root.as_ref().display(), kind);
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(middleware::from_fn_with_state(kind, set_disposition))
}
