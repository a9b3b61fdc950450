//! Queue module for RabbitMQ operations.
//!
//! This module provides:
//! - Wire types and the fixed queue names of the topology
//! - Topology setup, including TTL + dead-letter wiring for retry
//! - Publishing helpers for the output and reprocess queues
//!
//! ## Topology
//!
//! ```text
//! 01_*_process → Worker → 02_*_humanized          (generation succeeded)
//! 01_*_process → Worker → 01_*_reprocess          (generation failed)
//! 01_*_reprocess → (TTL, dead-letter) → 01_*_process
//! ```

pub mod publisher;
pub mod topology;
pub mod types;

pub use publisher::{publish_humanized, publish_reprocess};
pub use topology::ensure_topology;
pub use types::{
    AlertMessage, Category, HumanizedMessage, AUDIO_HUMANIZED_QUEUE, AUDIO_PROCESS_QUEUE,
    AUDIO_REPROCESS_QUEUE, MESSAGE_HUMANIZED_QUEUE, MESSAGE_PROCESS_QUEUE, MESSAGE_REPROCESS_QUEUE,
};
