//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the explicit class name is a well formed `::` path
//! - Check ignore patterns compile
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BootstrapConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use regex::Regex;
use thiserror::Error;

use crate::config::schema::BootstrapConfig;
use crate::resolver::NAMESPACE_SEPARATOR;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("application.class {0:?} is not a valid class path")]
    ClassName(String),

    #[error("stack.ignore_patterns entry {pattern:?} is not a valid regex: {reason}")]
    IgnorePattern { pattern: String, reason: String },

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("server.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BootstrapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(class) = &config.application.class {
        if !is_class_path(class) {
            errors.push(ValidationError::ClassName(class.clone()));
        }
    }

    for pattern in &config.stack.ignore_patterns {
        if let Err(e) = Regex::new(pattern) {
            errors.push(ValidationError::IgnorePattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every segment must be a non-empty identifier.
fn is_class_path(name: &str) -> bool {
    name.split(NAMESPACE_SEPARATOR).all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) => {
                (first.is_alphabetic() || first == '_')
                    && chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            None => false,
        }
    })
}
