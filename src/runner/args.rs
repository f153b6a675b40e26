//! Runner command line.
//!
//! The bootstrap layer passes arguments through untouched; the HTTP runner
//! parses them here and layers them over the configuration file.

use std::path::PathBuf;

use clap::Parser;

use crate::bootstrap::Environment;
use crate::config::{loader, BootstrapConfig};
use crate::error::BoxError;

#[derive(Debug, Clone, Default, Parser, PartialEq)]
#[command(name = "liftoff", about = "Run a liftoff application", long_about = None)]
pub struct RunnerArgs {
    /// Bind address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Runtime environment (development, test, production)
    #[arg(short, long)]
    pub environment: Option<Environment>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunnerArgs {
    /// Parse raw arguments (program name excluded).
    pub fn parse_raw(args: &[String]) -> Result<Self, clap::Error> {
        let argv = std::iter::once("liftoff").chain(args.iter().map(String::as_str));
        Self::try_parse_from(argv)
    }

    /// Effective settings: config file (or defaults), `LIFTOFF_*`
    /// environment overrides, then command line flags.
    pub fn settings(&self) -> Result<BootstrapConfig, BoxError> {
        let config = match &self.config {
            Some(path) => loader::load_config(path)?,
            None => BootstrapConfig::default(),
        };
        let mut config = loader::apply_env_overrides(config)?;
        self.apply_to(&mut config);
        Ok(config)
    }

    /// Overlay the command line flags onto `config`.
    pub fn apply_to(&self, config: &mut BootstrapConfig) {
        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(environment) = self.environment {
            config.application.environment = environment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(RunnerArgs::parse_raw(&[]).unwrap(), RunnerArgs::default());
    }

    #[test]
    fn test_short_flags() {
        let parsed = RunnerArgs::parse_raw(&args(&["-a", "127.0.0.1", "-p", "8080", "-e", "production", "-v"])).unwrap();
        assert_eq!(parsed.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(parsed.port, Some(8080));
        assert_eq!(parsed.environment, Some(Environment::Production));
        assert!(parsed.verbose);
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(RunnerArgs::parse_raw(&args(&["--frobnicate"])).is_err());
        assert!(RunnerArgs::parse_raw(&args(&["-e", "staging"])).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = BootstrapConfig::default();
        let parsed = RunnerArgs::parse_raw(&args(&["--port", "7000", "--environment", "test"])).unwrap();
        parsed.apply_to(&mut config);
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.application.environment, Environment::Test);
    }

    #[test]
    fn test_settings_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, "[server]\naddress = \"127.0.0.1\"\nport = 7100\n").unwrap();

        let parsed = RunnerArgs::parse_raw(&args(&["-c", path.to_str().unwrap(), "-p", "7200"])).unwrap();
        let settings = parsed.settings().unwrap();
        assert_eq!(settings.server.address, "127.0.0.1");
        assert_eq!(settings.server.port, 7200);
    }
}
