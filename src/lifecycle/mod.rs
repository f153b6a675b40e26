//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Finalize (exit.rs):
//!     host main → Bootstrap::finalize(setup result)
//!     → run_on_exit? → no pending error? → entry point == invoking file?
//!     → Fired (pipeline launched) | Skipped(reason)
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → runner stops serving → broadcast to plugins
//! ```
//!
//! # Design Decisions
//! - Launch is an explicit finalize call, not an implicit exit hook
//! - Finalize runs once; later calls are skipped
//! - A pending error is returned untouched and always prevents launch

pub mod exit;
pub mod shutdown;
pub mod signals;

pub use exit::{ExitDecision, SkipReason};
pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
