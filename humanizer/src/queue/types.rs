//! Queue message types and the fixed queue topology names.
//!
//! This module defines the wire formats for:
//! - `01_*_process` input queues: raw alert payloads
//! - `02_*_humanized` output queues: generated notifications
//! - `01_*_reprocess` retry queues: unmodified alert payloads awaiting redelivery

use serde::{Deserialize, Serialize};

/// Input queue for raw message alerts.
pub const MESSAGE_PROCESS_QUEUE: &str = "01_syrin_notification_message_process";

/// Input queue for raw audio alerts.
pub const AUDIO_PROCESS_QUEUE: &str = "01_syrin_notification_audio_process";

/// Output queue for humanized message alerts.
pub const MESSAGE_HUMANIZED_QUEUE: &str = "02_syrin_notification_message_process_humanized";

/// Output queue for humanized audio alerts.
pub const AUDIO_HUMANIZED_QUEUE: &str = "02_syrin_notification_audio_process_humanized";

/// Retry queue for message alerts; dead-letters back to the message input queue.
pub const MESSAGE_REPROCESS_QUEUE: &str = "01_syrin_notification_message_reprocess";

/// Retry queue for audio alerts; dead-letters back to the audio input queue.
pub const AUDIO_REPROCESS_QUEUE: &str = "01_syrin_notification_audio_reprocess";

// =============================================================================
// Alert Categories
// =============================================================================

/// Alert category, determined by the input queue a delivery arrived from.
///
/// Each category maps to exactly one input queue, one output queue, and one
/// retry queue whose dead-letter target is the input queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Text notification alerts.
    Message,
    /// Alerts destined for audio rendering downstream.
    Audio,
}

impl Category {
    /// All categories, in topology-declaration order.
    pub const ALL: [Category; 2] = [Category::Message, Category::Audio];

    /// Resolve a category from an input queue name.
    ///
    /// Returns `None` for any queue outside the known topology; such
    /// deliveries have no retry mapping and must be dropped.
    pub fn from_queue_name(name: &str) -> Option<Self> {
        match name {
            MESSAGE_PROCESS_QUEUE => Some(Category::Message),
            AUDIO_PROCESS_QUEUE => Some(Category::Audio),
            _ => None,
        }
    }

    /// The input queue this category consumes from.
    pub const fn input_queue(self) -> &'static str {
        match self {
            Category::Message => MESSAGE_PROCESS_QUEUE,
            Category::Audio => AUDIO_PROCESS_QUEUE,
        }
    }

    /// The output queue humanized payloads are published to.
    pub const fn output_queue(self) -> &'static str {
        match self {
            Category::Message => MESSAGE_HUMANIZED_QUEUE,
            Category::Audio => AUDIO_HUMANIZED_QUEUE,
        }
    }

    /// The retry queue failed generations are deferred to.
    pub const fn reprocess_queue(self) -> &'static str {
        match self {
            Category::Message => MESSAGE_REPROCESS_QUEUE,
            Category::Audio => AUDIO_REPROCESS_QUEUE,
        }
    }

    /// Short label for log events.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Message => "message",
            Category::Audio => "audio",
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Raw alert payload consumed from the input queues.
///
/// Immutable once parsed; the router only reads fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertMessage {
    /// Raw alert content to be rewritten.
    pub text: String,
    /// Severity or classification, empty when the producer omits it.
    #[serde(default)]
    pub level: String,
}

/// Generated notification published to the output queues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizedMessage {
    /// The alert text as it arrived.
    pub original_text: String,
    /// Severity carried over from the input payload.
    pub level: String,
    /// Natural-language rewrite returned by the generation service.
    pub humanized_text: String,
}

impl HumanizedMessage {
    /// Build the output payload for a successful generation.
    pub fn new(original: &AlertMessage, humanized_text: String) -> Self {
        Self {
            original_text: original.text.clone(),
            level: original.level.clone(),
            humanized_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_queue_name() {
        assert_eq!(
            Category::from_queue_name(MESSAGE_PROCESS_QUEUE),
            Some(Category::Message)
        );
        assert_eq!(
            Category::from_queue_name(AUDIO_PROCESS_QUEUE),
            Some(Category::Audio)
        );
        assert_eq!(Category::from_queue_name("some_other_queue"), None);
        assert_eq!(Category::from_queue_name(""), None);
    }

    #[test]
    fn test_category_queue_pairing() {
        // The retry queue dead-letters to the input queue, never the output.
        for category in Category::ALL {
            assert_ne!(category.input_queue(), category.output_queue());
            assert_ne!(category.reprocess_queue(), category.output_queue());
            assert!(Category::from_queue_name(category.input_queue()).is_some());
            assert!(Category::from_queue_name(category.output_queue()).is_none());
            assert!(Category::from_queue_name(category.reprocess_queue()).is_none());
        }
    }

    #[test]
    fn test_alert_message_deserialization() {
        let json = r#"{"text": "disk full on [prod-1]", "level": "critical"}"#;
        let message: AlertMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.text, "disk full on [prod-1]");
        assert_eq!(message.level, "critical");
    }

    #[test]
    fn test_alert_message_level_defaults_empty() {
        let json = r#"{"text": "disk full on [prod-1]"}"#;
        let message: AlertMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.text, "disk full on [prod-1]");
        assert_eq!(message.level, "");
    }

    #[test]
    fn test_humanized_message_serialization() {
        let original = AlertMessage {
            text: "disk full on [prod-1]".to_string(),
            level: "".to_string(),
        };
        let message = HumanizedMessage::new(&original, "Alert: prod-1 unstable...".to_string());

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["original_text"], "disk full on [prod-1]");
        assert_eq!(json["level"], "");
        assert_eq!(json["humanized_text"], "Alert: prod-1 unstable...");
    }
}
