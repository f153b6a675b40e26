//! Namespaced application with a plugin, configured from an optional TOML
//! file named by `HELLO_WORLD_CONFIG`.
//!
//! ```text
//! cargo run --example hello_world -- -p 9000 -v
//! ```

use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use liftoff::config::load_config;
use liftoff::{
    AppRegistry, Application, Bootstrap, BootstrapConfig, BoxError, Plugin, PluginContext,
    PluginDescriptor,
};
use serde_json::json;

#[derive(Default)]
struct HelloWorld;

impl Application for HelloWorld {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route("/", get(|| async { "hello world" }))
    }

    fn plugins(&self) -> Vec<PluginDescriptor> {
        vec![PluginDescriptor::new("greeter", Greeter).with_options(json!({ "greeting": "hi" }))]
    }
}

/// Logs once on start and once on shutdown.
struct Greeter;

impl Plugin for Greeter {
    fn start(&self, mut ctx: PluginContext) -> Result<(), BoxError> {
        let greeting = ctx.options["greeting"].as_str().unwrap_or("hello").to_string();
        tracing::info!(port = ctx.port, environment = %ctx.environment, %greeting, "Greeter ready");
        tokio::spawn(async move {
            let _ = ctx.shutdown.recv().await;
            tracing::info!("Greeter stopping");
        });
        Ok(())
    }
}

fn setup() -> Result<(Bootstrap, AppRegistry), BoxError> {
    let config = match std::env::var_os("HELLO_WORLD_CONFIG") {
        Some(path) => load_config(Path::new(&path))?,
        None => BootstrapConfig::default(),
    };
    let boot = Bootstrap::from_env_with(config)?;
    if boot.app_class().is_none() {
        boot.set_app_class("Demo::HelloWorld")?;
    }
    let registry = AppRegistry::new().with::<HelloWorld>("Demo::HelloWorld")?;
    Ok((boot, registry))
}

fn main() -> Result<(), BoxError> {
    let (boot, registry) = setup()?;
    boot.finish(Ok::<(), BoxError>(()), &registry, &liftoff::http_assembler())?;
    Ok(())
}
