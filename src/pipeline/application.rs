//! Contracts between the bootstrap layer and user applications.
//!
//! An application is a `Default` type implementing [`Application`],
//! registered under a class name in an `AppRegistry`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::broadcast;

use crate::bootstrap::Environment;
use crate::error::BoxError;

/// A user-defined application.
pub trait Application: Send + Sync + 'static {
    /// The routes this application serves.
    fn routes(self: Arc<Self>) -> Router;

    /// Middleware to wrap around the routes, outermost first.
    fn middleware(&self) -> Vec<Middleware> {
        Vec::new()
    }

    /// Plugins to start alongside the application, in start order.
    fn plugins(&self) -> Vec<PluginDescriptor> {
        Vec::new()
    }
}

/// Middleware an application can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Middleware {
    /// Assign an `x-request-id` to each request and echo it in the response.
    RequestId,
    /// Emit a tracing span per request.
    Trace,
    /// Fail requests that take longer than the given duration.
    Timeout(Duration),
    /// Reject bodies larger than the given number of bytes.
    BodyLimit(usize),
}

/// Something started by the runner before it begins serving.
pub trait Plugin: Send + Sync {
    /// Start the plugin. Runs inside the runner's async runtime, so it may
    /// spawn tasks; it should return promptly.
    fn start(&self, ctx: PluginContext) -> Result<(), BoxError>;
}

/// What a plugin receives on start.
#[derive(Debug)]
pub struct PluginContext {
    /// Port the runner serves on.
    pub port: u16,
    pub environment: Environment,
    /// Options from the plugin's descriptor.
    pub options: serde_json::Value,
    /// Fires once when the runner shuts down.
    pub shutdown: broadcast::Receiver<()>,
}

/// A plugin declared by an application.
#[derive(Clone)]
pub struct PluginDescriptor {
    name: String,
    options: serde_json::Value,
    plugin: Arc<dyn Plugin>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, plugin: impl Plugin + 'static) -> Self {
        Self {
            name: name.into(),
            options: serde_json::Value::Null,
            plugin: Arc::new(plugin),
        }
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &serde_json::Value {
        &self.options
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
