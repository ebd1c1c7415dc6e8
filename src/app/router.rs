use crate::adapters::{LocalStorage, VerificationClient};
use crate::config::ServerConfig;
use crate::core::{delay, export, inspect, memory, static_files, upload, user_agent, verify};
use crate::utils::headers::DispositionType;
use crate::utils::monitor::SystemMonitor;
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Everything handlers share; built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub storage: LocalStorage,
    pub verifier: VerificationClient,
    pub monitor: Arc<SystemMonitor>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            storage: LocalStorage::new(&config.upload_dir),
            verifier: VerificationClient::new(config.verify_endpoint.clone()),
            monitor: Arc::new(SystemMonitor::new()),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let static_mount = static_files::mount(&state.config.static_dir, DispositionType::Attachment);
    let public_mount = static_files::mount(&state.config.public_dir, DispositionType::Inline);

    Router::new()
        .route("/export", get(export::export).post(export::export))
        .route("/long", get(delay::long).post(delay::long))
        .route(
            "/memory-usage",
            get(memory::memory_usage).post(memory::memory_usage),
        )
        .route(
            "/user-agent",
            get(user_agent::user_agent).post(user_agent::user_agent),
        )
        .route("/upload-single", post(upload::upload_single))
        .route("/upload-multiple", post(upload::upload_multiple))
        .route("/verify-recaptcha-v3", post(verify::verify_recaptcha_v3))
        .route(
            "/verify-recaptcha-checkbox",
            post(verify::verify_recaptcha_checkbox),
        )
        .route("/ip", get(inspect::ip))
        .route("/with-referrer", get(inspect::with_referrer))
        .nest_service("/static", static_mount)
        .nest_service("/public", public_mount)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .layer(middleware::from_fn(preflight_no_content))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

/// Any origin may call, and scripts may read `Content-Disposition`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([CONTENT_DISPOSITION])
}

/// `CorsLayer` answers every `OPTIONS` itself with 200; browsers and older
/// clients expect 204.
async fn preflight_no_content(req: Request, next: Next) -> Response {
    let is_options = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
