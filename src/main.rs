use clap::Parser;
use preassessment_webhook_receiver::{config::Cli, serve, WebhookStore};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let addr = match cli.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("configuration: {e}");
            std::process::exit(2);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting pre-assessment webhook receiver"
    );

    if let Err(e) = serve(addr, Arc::new(WebhookStore::new())).await {
        error!(error = %e, "webhook receiver failed");
        std::process::exit(1);
    }
}
