//! Drive-to-Sheet video metadata sync binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vidsheet_cli::{SyncConfig, SyncPipeline};
use vidsheet_google::{load_service_account, DriveClient, HttpConfig, SheetsClient, TokenCache};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vidsheet=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting video URL & duration extraction");

    let config = SyncConfig::from_env();
    info!("Sync config: {:?}", config);

    // Credential loading is fatal: no session, no run.
    let auth = match load_service_account(&config.credentials_path) {
        Ok(auth) => auth,
        Err(e) => {
            error!("Failed to load credentials: {}", e);
            std::process::exit(1);
        }
    };

    let token_cache = Arc::new(TokenCache::new(auth));
    let http_config = HttpConfig::from_env();

    let drive = match DriveClient::new(Arc::clone(&token_cache), http_config.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Drive client: {}", e);
            std::process::exit(1);
        }
    };

    let sheets = match SheetsClient::new(token_cache, http_config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Sheets client: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = SyncPipeline::new(drive, sheets, config);

    match pipeline.run().await {
        Ok(summary) => {
            info!(
                updated = summary.updated,
                skipped = summary.skipped,
                unmatched = summary.unmatched,
                failed = summary.failed,
                "Done! All videos processed"
            );
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            std::process::exit(1);
        }
    }
}
