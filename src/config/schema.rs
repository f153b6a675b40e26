//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bootstrap
//! layer and the bundled HTTP runner. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::bootstrap::Environment;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Application selection and launch behavior.
    pub application: ApplicationConfig,

    /// Call stack inspection settings.
    pub stack: StackConfig,

    /// Settings consumed by the bundled HTTP runner.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Explicit application class (e.g. "Api::V1"). Derived from the
    /// invoking file name when unset.
    pub class: Option<String>,

    /// Launch the pipeline when the host program finalizes.
    pub run_on_exit: bool,

    /// Runtime environment.
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            class: None,
            run_on_exit: true,
            environment: Environment::Development,
        }
    }
}

/// Call stack inspection settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct StackConfig {
    /// Extra regular expressions for frames to skip, appended after the
    /// built-in framework patterns.
    pub ignore_patterns: Vec<String>,
}

/// HTTP runner settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g. "0.0.0.0").
    pub address: String,

    /// Listen port.
    pub port: u16,

    /// Request timeout in seconds. The HTTP runner applies it to every request.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes. The HTTP runner applies it to every request.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 9000,
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the metrics endpoint in the HTTP runner.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
