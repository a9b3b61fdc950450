//! Syrin humanizer worker binary.
//!
//! Consumes raw alerts from the `01_*_process` queues, humanizes them via the
//! configured generation service, and publishes the results to the
//! `02_*_humanized` queues, deferring failures to the reprocess queues.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use syrin_humanizer::{consumer, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging; broker client internals stay at warn.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lapin=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    tracing::info!("humanizer_starting");

    // Load configuration from environment
    let config = Config::from_env();
    tracing::info!(
        rabbitmq_host_set = !config.rabbitmq_host.is_empty(),
        rabbitmq_port = config.rabbitmq_port,
        rabbitmq_user_set = !config.rabbitmq_user.is_empty(),
        reprocess_ttl_ms = config.reprocess_ttl_ms,
        ollama_hostname_set = !config.ollama_hostname.is_empty(),
        ollama_model = %config.ollama_model,
        "config_loaded"
    );

    // Start the consumer
    consumer::run(config).await?;

    Ok(())
}
