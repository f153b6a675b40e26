//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap, lifecycle, pipeline, runner
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (finalize decisions, launches)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus scrape endpoint (HTTP runner, optional)
//! ```
//!
//! # Design Decisions
//! - Subscriber installation is idempotent; a host that already set one wins
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
