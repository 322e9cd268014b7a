//! AI escalation for element location
//!
//! Strictly best-effort: when the heuristic pipeline exhausts, a bounded
//! page snapshot plus the description goes to an external language-model
//! service, which proposes a selector, a strategy label, a confidence
//! value and alternatives. Suggestions are validated against the live
//! page before use. Every transport, parse or validation failure degrades
//! to "no suggestion"; this stage is never fatal.

pub mod client;
pub mod escalate;
pub mod prompt;
pub mod schema;
pub mod snapshot;

pub use client::{EscalationConfig, LlmClient};
pub use escalate::{AiLocator, EscalationOutcome, HybridLocator};
pub use schema::SelectorSuggestion;
pub use snapshot::sanitize_snapshot;
