use crate::utils::error::SandboxError;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Named inputs of a request: body fields first, query string as fallback.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    body: Map<String, Value>,
    query: HashMap<String, String>,
}

impl RequestParams {
    pub fn new(body: Map<String, Value>, query: HashMap<String, String>) -> Self {
        Self { body, query }
    }

    pub fn from_query(query: Option<&str>) -> Self {
        Self {
            body: Map::new(),
            query: parse_query(query),
        }
    }

    /// Body value when it is truthy, otherwise the query value.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.body.get(name) {
            Some(value) if is_truthy(value) => Some(value.clone()),
            _ => self.query.get(name).map(|v| Value::String(v.clone())),
        }
    }

    pub fn get_str(&self, name: &str) -> Option<String> {
        self.get(name).map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Coerces `name` to a positive integer, falling back to `default`.
    pub fn positive_or(&self, name: &str, default: u64) -> u64 {
        coerce_positive(self.get(name).as_ref()).unwrap_or(default)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion: numbers, numeric strings and `true` are accepted,
/// truncated toward zero, and kept only when at least 1.
pub fn coerce_positive(value: Option<&Value>) -> Option<u64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };

    if !number.is_finite() {
        return None;
    }

    let truncated = number.trunc();
    if truncated >= 1.0 && truncated <= u64::MAX as f64 {
        Some(truncated as u64)
    } else {
        None
    }
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

fn parse_form(bytes: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

fn body_kind(req: &Request) -> Option<&'static str> {
    let content_type = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        Some("json")
    } else if mime == "application/x-www-form-urlencoded" {
        Some("form")
    } else {
        None
    }
}

#[async_trait]
impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = SandboxError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = parse_query(req.uri().query());
        let kind = body_kind(&req);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| SandboxError::BodyRejected {
                status: e.status(),
                message: e.body_text(),
            })?;

        let body = match kind {
            _ if bytes.is_empty() => Map::new(),
            Some("json") => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => Map::new(),
                Err(e) => return Err(SandboxError::bad_request(format!("malformed JSON body: {e}"))),
            },
            Some("form") => parse_form(&bytes),
            // Text and raw bodies are accepted but carry no named fields.
            _ => Map::new(),
        };

        Ok(Self { body, query })
    }
}
