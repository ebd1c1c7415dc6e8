use crate::utils::error::Result;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Upstream reply, kept byte-for-byte.
#[derive(Debug, Clone)]
pub struct VerificationReply {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Server-to-server client for the verification service.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    client: Client,
    endpoint: String,
}

impl VerificationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Posts `secret` and `response` as a form; non-2xx replies become errors.
    pub async fn verify(&self, token: &str, secret: &str) -> Result<VerificationReply> {
        tracing::debug!("Forwarding verification token to: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Verification response status: {}", response.status());

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(VerificationReply { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SandboxError;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_verify_posts_form_and_keeps_body() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/siteverify")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body_contains("secret=s3cret")
                    .body_contains("response=tok-123");
                then.status(200)
                    .header("content-type", "application/json; charset=utf-8")
                    .body(r#"{ "success": true, "score": 0.9 }"#);
            })
            .await;

        let client = VerificationClient::new(server.url("/siteverify"));
        let reply = client.verify("tok-123", "s3cret").await.unwrap();

        upstream.assert_async().await;
        assert_eq!(&reply.body[..], br#"{ "success": true, "score": 0.9 }"#);
        assert_eq!(
            reply.content_type.as_deref(),
            Some("application/json; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/siteverify");
                then.status(500);
            })
            .await;

        let client = VerificationClient::new(server.url("/siteverify"));
        let result = client.verify("tok", "secret").await;

        assert!(matches!(result, Err(SandboxError::UpstreamError(_))));
    }
}
