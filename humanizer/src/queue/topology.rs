//! Queue topology setup.
//!
//! Declares the input, output, and reprocess queues for every category before
//! consumption starts. Declarations are idempotent; re-declaring an existing
//! queue with identical arguments neither errors nor loses messages.
//!
//! A reprocess queue holds a message for its configured TTL, then the broker
//! dead-letters it through the default exchange back to the category's input
//! queue, where it is consumed again as a fresh delivery.

use lapin::{
    options::QueueDeclareOptions,
    types::{AMQPValue, FieldTable},
    Channel,
};
use tracing::{error, info};

use crate::config::Config;
use crate::queue::types::Category;

/// Declare every queue the worker relies on.
///
/// Each declaration is independently guarded: a failed declare is logged and
/// the remaining declarations still run. Connection-level failures are fatal
/// earlier, at connect time.
pub async fn ensure_topology(channel: &Channel, config: &Config) {
    for category in Category::ALL {
        declare_standard_queue(channel, category.input_queue()).await;
        declare_standard_queue(channel, category.output_queue()).await;
        declare_reprocess_queue(channel, category, config.reprocess_ttl_ms).await;
    }
}

/// Declare a plain durable queue with no arguments.
async fn declare_standard_queue(channel: &Channel, queue: &str) {
    let result = channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await;

    match result {
        Ok(_) => info!(queue = queue, "queue_declared"),
        Err(e) => error!(queue = queue, error = %e, "queue_declare_failed"),
    }
}

/// Declare a category's durable reprocess queue with its TTL and dead-letter
/// wiring back to the input queue.
async fn declare_reprocess_queue(channel: &Channel, category: Category, ttl_ms: u32) {
    let queue = category.reprocess_queue();
    let dead_letter_queue = category.input_queue();

    let result = channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            reprocess_queue_args(ttl_ms, dead_letter_queue),
        )
        .await;

    match result {
        Ok(_) => info!(
            queue = queue,
            ttl_ms = ttl_ms,
            dead_letter_queue = dead_letter_queue,
            "reprocess_queue_declared"
        ),
        Err(e) => error!(queue = queue, error = %e, "reprocess_queue_declare_failed"),
    }
}

/// Broker arguments for a reprocess queue: hold messages for `ttl_ms`, then
/// dead-letter them through the default exchange to `dead_letter_queue`.
pub fn reprocess_queue_args(ttl_ms: u32, dead_letter_queue: &str) -> FieldTable {
    let mut args = FieldTable::default();
    args.insert("x-message-ttl".into(), AMQPValue::LongLongInt(i64::from(ttl_ms)));
    args.insert("x-dead-letter-exchange".into(), AMQPValue::LongString("".into()));
    args.insert(
        "x-dead-letter-routing-key".into(),
        AMQPValue::LongString(dead_letter_queue.into()),
    );
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::types::MESSAGE_PROCESS_QUEUE;
    use lapin::types::ShortString;

    #[test]
    fn test_reprocess_queue_args() {
        let args = reprocess_queue_args(60_000, MESSAGE_PROCESS_QUEUE);
        let inner = args.inner();

        assert_eq!(
            inner.get(&ShortString::from("x-message-ttl")),
            Some(&AMQPValue::LongLongInt(60_000))
        );
        assert_eq!(
            inner.get(&ShortString::from("x-dead-letter-exchange")),
            Some(&AMQPValue::LongString("".into()))
        );
        assert_eq!(
            inner.get(&ShortString::from("x-dead-letter-routing-key")),
            Some(&AMQPValue::LongString(MESSAGE_PROCESS_QUEUE.into()))
        );
    }

    #[test]
    fn test_reprocess_args_target_is_input_queue() {
        for category in Category::ALL {
            let args = reprocess_queue_args(1_000, category.input_queue());
            let target = args
                .inner()
                .get(&ShortString::from("x-dead-letter-routing-key"))
                .cloned();
            assert_eq!(
                target,
                Some(AMQPValue::LongString(category.input_queue().into()))
            );
        }
    }
}
