use crate::core::params::RequestParams;
use axum::Json;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Answers `{ "message": "OK" }` after `duration` milliseconds.
pub async fn long(params: RequestParams) -> Json<Value> {
    let duration = params.positive_or("duration", DEFAULT_DURATION_MS);
    tracing::debug!("Holding response for {}ms", duration);

    tokio::time::sleep(Duration::from_millis(duration)).await;

    Json(json!({ "message": "OK" }))
}
