//! Publishing helpers for the output and reprocess queues.
//!
//! Both paths publish persistent JSON bodies to the default exchange, with
//! the queue name as routing key, on the same channel the consumer uses.

use anyhow::{Context, Result};
use lapin::{options::BasicPublishOptions, BasicProperties, Channel};
use tracing::info;

use super::types::{Category, HumanizedMessage};

/// Publish a humanized payload to the category's output queue.
pub async fn publish_humanized(
    channel: &Channel,
    category: Category,
    message: &HumanizedMessage,
) -> Result<()> {
    let body = serde_json::to_vec(message).context("Failed to serialize humanized message")?;
    let queue = category.output_queue();

    channel
        .basic_publish(
            "",
            queue,
            BasicPublishOptions::default(),
            &body,
            BasicProperties::default()
                .with_delivery_mode(2) // Persistent
                .with_content_type("application/json".into()),
        )
        .await
        .context("Failed to publish humanized message")?
        .await
        .context("Failed to confirm humanized publish")?;

    info!(
        queue = queue,
        category = category.as_str(),
        body_length = body.len(),
        "humanized_published"
    );

    Ok(())
}

/// Defer a message to the category's reprocess queue.
///
/// The original delivery body is republished verbatim; the broker holds it
/// for the queue TTL, then dead-letters it back to the input queue where it
/// is consumed again as a fresh delivery.
pub async fn publish_reprocess(
    channel: &Channel,
    category: Category,
    raw_body: &[u8],
) -> Result<()> {
    let queue = category.reprocess_queue();

    channel
        .basic_publish(
            "",
            queue,
            BasicPublishOptions::default(),
            raw_body,
            BasicProperties::default()
                .with_delivery_mode(2) // Persistent
                .with_content_type("application/json".into()),
        )
        .await
        .context("Failed to publish to reprocess queue")?
        .await
        .context("Failed to confirm reprocess publish")?;

    info!(
        queue = queue,
        category = category.as_str(),
        body_length = raw_body.len(),
        "reprocess_published"
    );

    Ok(())
}
