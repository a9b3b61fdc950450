//! RabbitMQ consumer module using lapin.
//!
//! This module handles connecting to RabbitMQ, declaring the queue topology,
//! consuming from both input queues, and handing each delivery to the router.
//! Deliveries are processed one at a time and acknowledged unconditionally
//! after routing, so only the explicit reprocess path causes redelivery.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use lapin::{
    message::Delivery,
    options::{BasicAckOptions, BasicConsumeOptions, BasicQosOptions},
    types::FieldTable,
    Channel, Connection, ConnectionProperties,
};
use reqwest::Client;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::generation::GenerationClient;
use crate::queue::{
    ensure_topology, AlertMessage, Category, AUDIO_PROCESS_QUEUE, MESSAGE_PROCESS_QUEUE,
};
use crate::router::Router;

/// Connection name reported to the broker.
const CONNECTION_NAME: &str = "syrin-text-humanizer";

/// Run the consumer until shutdown or a setup-level failure.
///
/// This function:
/// 1. Connects to RabbitMQ (fatal on failure)
/// 2. Creates a channel with QoS 1 for strictly sequential processing
/// 3. Ensures the queue topology (individually guarded declares)
/// 4. Consumes both input queues, routing every delivery
/// 5. Handles graceful shutdown on SIGINT/SIGTERM
///
/// The connection is closed on every exit path.
pub async fn run(config: Config) -> Result<()> {
    let config = Arc::new(config);

    info!(
        host = %config.rabbitmq_host,
        port = config.rabbitmq_port,
        vhost = %config.rabbitmq_vhost,
        "rabbitmq_connecting"
    );

    let conn = Connection::connect(
        &config.amqp_url(),
        ConnectionProperties::default().with_connection_name(CONNECTION_NAME.into()),
    )
    .await
    .context("Failed to connect to RabbitMQ")?;

    info!("rabbitmq_connected");

    let result = consume(&conn, config).await;

    if let Err(ref e) = result {
        error!(error = %e, "consume_failed");
    }

    if conn.status().connected() {
        if let Err(e) = conn.close(200, "Normal shutdown").await {
            warn!(error = %e, "rabbitmq_connection_close_error");
        } else {
            info!("rabbitmq_connection_closed");
        }
    }

    result
}

/// Consume-phase setup and the delivery loop.
async fn consume(conn: &Connection, config: Arc<Config>) -> Result<()> {
    let channel = conn
        .create_channel()
        .await
        .context("Failed to create channel")?;

    info!("rabbitmq_channel_created");

    // One in-flight delivery: a message is fully routed, including the
    // bounded generation call, before the next one is taken.
    channel
        .basic_qos(1, BasicQosOptions::default())
        .await
        .context("Failed to set QoS")?;

    ensure_topology(&channel, &config).await;

    let message_consumer = channel
        .basic_consume(
            MESSAGE_PROCESS_QUEUE,
            "syrin-humanizer-message",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .context("Failed to start message consumer")?;

    let audio_consumer = channel
        .basic_consume(
            AUDIO_PROCESS_QUEUE,
            "syrin-humanizer-audio",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .context("Failed to start audio consumer")?;

    info!(
        message_queue = MESSAGE_PROCESS_QUEUE,
        audio_queue = AUDIO_PROCESS_QUEUE,
        "rabbitmq_consumers_started"
    );
    info!("worker_ready");

    let http = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let generator = GenerationClient::new(http, &config.ollama_hostname, &config.ollama_model);
    let router = Router::new(channel.clone(), generator, Arc::clone(&config));

    // Broker-level interleaving of the two queues onto one sequential handler.
    let mut deliveries = futures::stream::select(message_consumer, audio_consumer);

    // Create shutdown signal future
    let shutdown = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT"),
            _ = terminate => info!("Received SIGTERM"),
        }
    };

    // Pin the shutdown future
    tokio::pin!(shutdown);

    // Process messages until shutdown
    loop {
        tokio::select! {
            // Check for shutdown signal
            _ = &mut shutdown => {
                info!("worker_stopping");
                break;
            }
            // Process next message, fully, before taking another
            delivery = deliveries.next() => {
                match delivery {
                    Some(Ok(delivery)) => handle_delivery(&channel, &router, delivery).await,
                    Some(Err(e)) => {
                        error!(error = %e, "rabbitmq_delivery_error");
                    }
                    None => {
                        warn!("rabbitmq_consumer_closed");
                        break;
                    }
                }
            }
        }
    }

    info!("worker_shutdown_complete");
    Ok(())
}

/// Handle one delivery end to end.
///
/// The delivery is acknowledged exactly once, after routing completes,
/// whatever the outcome. Unknown queues and malformed bodies are dropped
/// with an error log; neither has a retry mapping.
async fn handle_delivery(channel: &Channel, router: &Router, delivery: Delivery) {
    let queue_name = delivery.routing_key.as_str().to_string();
    let delivery_tag = delivery.delivery_tag;

    let outcome = match Category::from_queue_name(&queue_name) {
        Some(category) => match serde_json::from_slice::<AlertMessage>(&delivery.data) {
            Ok(message) => {
                info!(
                    queue = %queue_name,
                    category = category.as_str(),
                    delivery_tag = delivery_tag,
                    "alert_received"
                );
                Some(router.route(category, &message, &delivery.data).await)
            }
            Err(e) => {
                error!(queue = %queue_name, error = %e, "alert_parse_failed");
                None
            }
        },
        None => {
            error!(queue = %queue_name, "unknown_queue");
            None
        }
    };

    if let Err(e) = channel
        .basic_ack(delivery_tag, BasicAckOptions::default())
        .await
    {
        error!(
            delivery_tag = delivery_tag,
            error = %e,
            "rabbitmq_ack_failed"
        );
    } else if let Some(outcome) = outcome {
        info!(
            queue = %queue_name,
            outcome = ?outcome,
            delivery_tag = delivery_tag,
            "alert_completed"
        );
    }
}
