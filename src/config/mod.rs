pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 1333;
pub const DEFAULT_VERIFY_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;
pub const MAX_TRUSTED_PROXY_HOPS: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "http-sandbox")]
#[command(about = "HTTP test-harness server for exercising clients, proxies and browsers")]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    #[serde(default = "default_host")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    #[serde(default = "default_port")]
    pub port: u16,

    #[arg(long, default_value = "./static")]
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[arg(long, default_value = "./public")]
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    #[arg(long, default_value = "./uploads")]
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[arg(long, env = "RECAPTCHA_V3_SECRET", hide_env_values = true)]
    #[serde(default)]
    pub recaptcha_v3_secret: Option<String>,

    #[arg(long, env = "RECAPTCHA_CHECKBOX_SECRET", hide_env_values = true)]
    #[serde(default)]
    pub recaptcha_checkbox_secret: Option<String>,

    #[arg(long, default_value = DEFAULT_VERIFY_ENDPOINT)]
    #[serde(default = "default_verify_endpoint")]
    pub verify_endpoint: String,

    /// Reverse-proxy hops whose `X-Forwarded-For` entries are trusted.
    #[arg(long, default_value_t = 1)]
    #[serde(default = "default_trusted_proxy_hops")]
    pub trusted_proxy_hops: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[arg(long, help = "Enable verbose output")]
    #[serde(default)]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    #[serde(default)]
    pub log_json: bool,

    #[arg(long, help = "Load the whole configuration from a TOML file")]
    #[serde(skip)]
    pub config: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_static_dir() -> String {
    "./static".to_string()
}

fn default_public_dir() -> String {
    "./public".to_string()
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_verify_endpoint() -> String {
    DEFAULT_VERIFY_ENDPOINT.to_string()
}

fn default_trusted_proxy_hops() -> usize {
    1
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            public_dir: default_public_dir(),
            upload_dir: default_upload_dir(),
            recaptcha_v3_secret: None,
            recaptcha_checkbox_secret: None,
            verify_endpoint: default_verify_endpoint(),
            trusted_proxy_hops: default_trusted_proxy_hops(),
            max_body_bytes: default_max_body_bytes(),
            verbose: false,
            log_json: false,
            config: None,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_url("verify_endpoint", &self.verify_endpoint)?;
        validate_path("static_dir", &self.static_dir)?;
        validate_path("public_dir", &self.public_dir)?;
        validate_path("upload_dir", &self.upload_dir)?;
        validate_positive_number("max_body_bytes", self.max_body_bytes, 1)?;
        validate_range(
            "trusted_proxy_hops",
            self.trusted_proxy_hops,
            0,
            MAX_TRUSTED_PROXY_HOPS,
        )?;

        if let Some(secret) = &self.recaptcha_v3_secret {
            validate_non_empty_string("recaptcha_v3_secret", secret)?;
        }
        if let Some(secret) = &self.recaptcha_checkbox_secret {
            validate_non_empty_string("recaptcha_checkbox_secret", secret)?;
        }

        Ok(())
    }
}
