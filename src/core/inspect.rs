use crate::app::router::AppState;
use crate::core::params::RequestParams;
use crate::domain::model::ConnectionReport;
use crate::utils::error::{Result, SandboxError};
use crate::utils::headers::found;
use axum::extract::{ConnectInfo, State};
use axum::http::header::REFERER;
use axum::http::{HeaderMap, Uri};
use axum::response::Response;
use axum::Json;
use std::net::{IpAddr, SocketAddr};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address after walking back `trusted_hops` proxies.
///
/// The socket peer is hop 0; `X-Forwarded-For` entries follow from right to
/// left. The first untrusted address wins, or the furthest one known.
pub fn resolve_client_ip(socket: IpAddr, forwarded_for: Option<&str>, trusted_hops: usize) -> String {
    let mut chain = vec![socket.to_string()];
    if let Some(forwarded_for) = forwarded_for {
        chain.extend(
            forwarded_for
                .rsplit(',')
                .map(str::trim)
                .filter(|addr| !addr.is_empty())
                .map(str::to_string),
        );
    }

    let idx = trusted_hops.min(chain.len() - 1);
    chain.swap_remove(idx)
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    (!values.is_empty()).then(|| values.join(", "))
}

pub async fn ip(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<ConnectionReport> {
    let x_forwarded_for = forwarded_for(&headers);
    let ip = resolve_client_ip(
        peer.ip(),
        x_forwarded_for.as_deref(),
        state.config.trusted_proxy_hops,
    );

    Json(ConnectionReport {
        ip,
        remote_address: peer.ip().to_string(),
        x_forwarded_for,
    })
}

/// Redirects to `redirect`, carrying the caller's referrer along when it sent one.
pub fn referrer_location(redirect: &str, referrer: Option<&str>) -> String {
    match referrer {
        Some(referrer) if !referrer.is_empty() => format!("{redirect}?referrer={referrer}"),
        _ => redirect.to_string(),
    }
}

pub async fn with_referrer(uri: Uri, headers: HeaderMap) -> Result<Response> {
    let params = RequestParams::from_query(uri.query());
    let redirect = params
        .get_str("redirect")
        .filter(|target| !target.is_empty())
        .ok_or_else(|| SandboxError::bad_request("missing `redirect` query parameter"))?;

    let referrer = headers
        .get(REFERER)
        .or_else(|| headers.get("referrer"))
        .and_then(|v| v.to_str().ok());

    found(&referrer_location(&redirect, referrer))
}
