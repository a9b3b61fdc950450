//! Message routing - the per-delivery decision logic.
//!
//! For each consumed alert the router selects the category's prompt, invokes
//! the generation client, and dispatches exactly one publish: the humanized
//! payload to the output queue on success, or the original body to the
//! reprocess queue on failure. Publish failures are logged and contained so
//! the consumer can still acknowledge the delivery.

use std::sync::Arc;

use lapin::Channel;
use tracing::{error, info};

use crate::config::Config;
use crate::generation::GenerationClient;
use crate::queue::{publish_humanized, publish_reprocess, AlertMessage, Category, HumanizedMessage};

/// Routing decision taken for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterOutcome {
    /// Generation succeeded; the humanized payload went to the output queue.
    Humanized,
    /// Generation failed; the original body was deferred to the reprocess
    /// queue for delayed redelivery.
    Reprocessed,
}

/// Routes consumed alerts to their output or reprocess queue.
pub struct Router {
    channel: Channel,
    generator: GenerationClient,
    config: Arc<Config>,
}

impl Router {
    /// Create a router publishing on the given channel.
    pub fn new(channel: Channel, generator: GenerationClient, config: Arc<Config>) -> Self {
        Self {
            channel,
            generator,
            config,
        }
    }

    /// Route one alert.
    ///
    /// `raw_body` is the delivery body as received; the reprocess path
    /// republishes it verbatim so producer fields outside [`AlertMessage`]
    /// survive the retry cycle.
    pub async fn route(
        &self,
        category: Category,
        message: &AlertMessage,
        raw_body: &[u8],
    ) -> RouterOutcome {
        let prompt = self.config.prompt_for(category);

        match self.generator.generate(&message.text, prompt).await {
            Ok(humanized_text) => {
                let humanized = HumanizedMessage::new(message, humanized_text);

                if let Err(e) = publish_humanized(&self.channel, category, &humanized).await {
                    error!(
                        category = category.as_str(),
                        error = %e,
                        "humanized_publish_failed"
                    );
                }

                RouterOutcome::Humanized
            }
            Err(e) => {
                error!(
                    category = category.as_str(),
                    error = %e,
                    "generation_failed"
                );

                if let Err(e) = publish_reprocess(&self.channel, category, raw_body).await {
                    error!(
                        category = category.as_str(),
                        error = %e,
                        "reprocess_publish_failed"
                    );
                } else {
                    info!(
                        category = category.as_str(),
                        queue = category.reprocess_queue(),
                        "alert_deferred"
                    );
                }

                RouterOutcome::Reprocessed
            }
        }
    }
}
