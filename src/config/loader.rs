//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::bootstrap::Environment;
use crate::config::schema::BootstrapConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Selects the runtime environment.
pub const ENV_VAR_ENVIRONMENT: &str = "LIFTOFF_ENV";
/// Overrides `application.class`.
pub const ENV_VAR_APP_CLASS: &str = "LIFTOFF_APP_CLASS";
/// Extra ignore patterns, separated by `;`.
pub const ENV_VAR_IGNORE_CALLERS: &str = "LIFTOFF_IGNORE_CALLERS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BootstrapConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BootstrapConfig, ConfigError> {
    let config: BootstrapConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `LIFTOFF_*` overrides from the process environment.
pub fn apply_env_overrides(config: BootstrapConfig) -> Result<BootstrapConfig, ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup, then re-validate.
pub fn apply_overrides_from<F>(mut config: BootstrapConfig, lookup: F) -> Result<BootstrapConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env) = lookup(ENV_VAR_ENVIRONMENT) {
        match env.parse::<Environment>() {
            Ok(env) => config.application.environment = env,
            Err(e) => tracing::warn!(variable = ENV_VAR_ENVIRONMENT, error = %e, "Ignoring environment override"),
        }
    }

    if let Some(class) = lookup(ENV_VAR_APP_CLASS).filter(|c| !c.is_empty()) {
        config.application.class = Some(class);
    }

    if let Some(patterns) = lookup(ENV_VAR_IGNORE_CALLERS) {
        config.stack.ignore_patterns.extend(
            patterns
                .split(';')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
        );
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
