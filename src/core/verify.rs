use crate::app::router::AppState;
use crate::core::params::RequestParams;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Which configured secret a verification route uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecaptchaKind {
    V3,
    Checkbox,
}

impl RecaptchaKind {
    fn secret_field(self) -> &'static str {
        match self {
            Self::V3 => "recaptcha_v3_secret",
            Self::Checkbox => "recaptcha_checkbox_secret",
        }
    }
}

async fn verify(state: &AppState, kind: RecaptchaKind, params: RequestParams) -> Result<Response> {
    let secret = match kind {
        RecaptchaKind::V3 => &state.config.recaptcha_v3_secret,
        RecaptchaKind::Checkbox => &state.config.recaptcha_checkbox_secret,
    };
    let secret = validate_required_field(kind.secret_field(), secret)?;
    let token = params.get_str("response").unwrap_or_default();

    tracing::debug!("Verifying {:?} token ({} chars)", kind, token.len());
    let reply = state.verifier.verify(&token, secret).await?;

    let content_type = reply
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok((StatusCode::OK, [(CONTENT_TYPE, content_type)], reply.body).into_response())
}

pub async fn verify_recaptcha_v3(
    State(state): State<AppState>,
    params: RequestParams,
) -> Result<Response> {
    verify(&state, RecaptchaKind::V3, params).await
}

pub async fn verify_recaptcha_checkbox(
    State(state): State<AppState>,
    params: RequestParams,
) -> Result<Response> {
    verify(&state, RecaptchaKind::Checkbox, params).await
}
