//! Heuristic element location
//!
//! Resolves a human-language element description ("login button",
//! "이메일 입력 필드") into an actionable element via an ordered,
//! short-circuiting stage pipeline:
//! - role hint, visible text, associated label
//! - placeholder / name / id / title attribute matching
//! - structural selector templates triggered by description keywords
//!
//! A resolution miss is `None`, never an error; only the safe click/fill
//! wrappers raise after their retries are exhausted.

pub mod engine;
pub mod errors;
pub mod stages;
pub mod types;
pub mod variants;

pub use engine::HeuristicEngine;
pub use errors::LocatorError;
pub use stages::{stage_pipeline, Stage};
pub use types::{LocatorCandidate, LocatorQuery};
pub use variants::text_variants;
