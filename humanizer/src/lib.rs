//! Syrin humanizer - alert humanization worker.
//!
//! Consumes raw alert messages from two RabbitMQ input queues, rewrites their
//! text into human-friendly notifications via an external generation service,
//! and republishes the result to the matching output queues. Failed
//! generations are deferred to TTL'd reprocess queues that dead-letter back
//! to the input queues after a fixed delay.
//!
//! ## Architecture
//!
//! ```text
//! 01_*_process → Consumer → Router → Generation service
//!                              │
//!                              ├─ success → 02_*_humanized
//!                              └─ failure → 01_*_reprocess ─(TTL)→ 01_*_process
//! ```

pub mod config;
pub mod consumer;
pub mod generation;
pub mod queue;
pub mod router;

// Re-export commonly used types
pub use config::Config;
pub use generation::{GenerationClient, GenerationError};
pub use queue::{AlertMessage, Category, HumanizedMessage};
pub use router::{Router, RouterOutcome};
