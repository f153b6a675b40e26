//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → loader.rs (LIFTOFF_* environment overrides)
//!     → BootstrapConfig (validated, immutable)
//!     → Bootstrap::from_config / HTTP runner
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, load_config};
pub use schema::{ApplicationConfig, BootstrapConfig, ObservabilityConfig, ServerConfig, StackConfig};
