//! Browser page capability boundary
//!
//! The mapper and locator crates never talk to a browser directly; they
//! consume the `PageDriver` trait defined here. Probes are a closed set of
//! query shapes with per-call timeouts, so a timed-out probe yields an
//! empty match list rather than an error.
//!
//! `FixtureDriver` is a deterministic in-memory implementation used by
//! unit tests: it replays recorded element tables and page graphs without
//! a live browser.

pub mod driver;
pub mod errors;
pub mod fixture;
pub mod probe;

pub use driver::{ElementRef, PageDriver, SettleWait};
pub use errors::DriverError;
pub use fixture::{FixtureDriver, FixtureElement, FixturePage};
pub use probe::Probe;

use std::time::Duration;

/// Default budget for a single DOM probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound for a full navigation or modal wait.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(5);
