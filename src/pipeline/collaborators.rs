//! Collaborator contracts: the runner and the middleware builder.

use std::sync::Arc;

use crate::error::BoxError;
use crate::pipeline::application::{Application, PluginDescriptor};
use crate::resolver::AppClass;

/// Owns execution once the pipeline is handed over.
pub trait Runner {
    /// The handler chain this runner serves.
    type Chain;

    /// Attach the built handler chain.
    fn set_app(&mut self, chain: Self::Chain);

    /// Register plugins, in order, before the runner starts.
    fn load_plugins(&mut self, plugins: Vec<PluginDescriptor>) -> Result<(), BoxError>;

    /// Start serving. Blocks until the runner is done.
    fn run(self) -> Result<(), BoxError>;
}

/// Creates a runner from the raw process arguments and the application.
pub trait RunnerFactory {
    type Runner: Runner;

    fn create(&self, args: Vec<String>, app: Arc<dyn Application>) -> Result<Self::Runner, BoxError>;
}

/// Builds the handler chain for an application.
pub trait MiddlewareBuilder {
    type Chain;

    fn build(&self, class: &AppClass, app: Arc<dyn Application>) -> Result<Self::Chain, BoxError>;
}
