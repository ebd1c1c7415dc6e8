use clap::Parser;
use http_sandbox::utils::{logger, validation::Validate};
use http_sandbox::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ServerConfig::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = ServerConfig::from_file(path)?;
            config.verbose |= cli.verbose;
            config.log_json |= cli.log_json;
            config
        }
        None => cli,
    };

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting http-sandbox");
    if config.verbose {
        tracing::debug!(
            "Listening on {}, verify endpoint {}, trusted proxy hops {}",
            config.listen_addr(),
            config.verify_endpoint,
            config.trusted_proxy_hops
        );
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    for (field, secret) in [
        ("recaptcha_v3_secret", &config.recaptcha_v3_secret),
        ("recaptcha_checkbox_secret", &config.recaptcha_checkbox_secret),
    ] {
        if secret.is_none() {
            tracing::warn!("⚠️ {} is not set; its verification route will answer 500", field);
        }
    }

    http_sandbox::serve(config).await?;
    Ok(())
}
