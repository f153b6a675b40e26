//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the log filter from RUST_LOG, falling back to configuration
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` always wins over configured levels

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// The filter directive used when RUST_LOG is unset.
pub fn default_directive(config: &ObservabilityConfig, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    format!("liftoff={level},tower_http={level},{level}")
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init_logging(config: &ObservabilityConfig, verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let config = ObservabilityConfig::default();
        assert_eq!(default_directive(&config, false), "liftoff=info,tower_http=info,info");
        assert_eq!(default_directive(&config, true), "liftoff=debug,tower_http=debug,debug");
    }
}
