//! Pipeline assembly and launch.
//!
//! # Responsibilities
//! - Resolve the application class (explicit or derived name)
//! - Instantiate it and hand it, with the raw arguments, to a new runner
//! - Attach the middleware chain and the application's plugins
//! - Start the runner
//!
//! # Design Decisions
//! - ClassNotFound is terminal; nothing is retried
//! - Collaborator failures pass through unchanged

use std::sync::Arc;

use crate::bootstrap::Bootstrap;
use crate::error::{BootstrapError, BootstrapResult};
use crate::observability::metrics;
use crate::pipeline::application::Application;
use crate::pipeline::collaborators::{MiddlewareBuilder, Runner, RunnerFactory};
use crate::resolver::{self, AppClass, ClassLookup};

/// An assembled pipeline, ready to hand to its runner.
pub struct Pipeline<R> {
    class: AppClass,
    app: Arc<dyn Application>,
    args: Vec<String>,
    plugins: Vec<String>,
    runner: R,
}

impl<R: Runner> Pipeline<R> {
    pub fn class(&self) -> &AppClass {
        &self.class
    }

    pub fn app(&self) -> &Arc<dyn Application> {
        &self.app
    }

    /// Raw arguments given to the runner.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Names of the plugins registered with the runner.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Hand off to the runner.
    pub fn launch(self) -> BootstrapResult<()> {
        tracing::info!(
            class = %self.class,
            plugins = self.plugins.len(),
            "Launching application"
        );
        metrics::record_launch(self.class.name());
        self.runner.run().map_err(BootstrapError::collaborator)
    }
}

impl<R> std::fmt::Debug for Pipeline<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("class", &self.class)
            .field("args", &self.args)
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

/// Builds pipelines from a runner factory and a middleware builder.
#[derive(Debug, Clone, Default)]
pub struct PipelineAssembler<F, M> {
    factory: F,
    builder: M,
}

impl<F, M> PipelineAssembler<F, M>
where
    F: RunnerFactory,
    M: MiddlewareBuilder<Chain = <F::Runner as Runner>::Chain>,
{
    pub fn new(factory: F, builder: M) -> Self {
        Self { factory, builder }
    }

    /// Resolve, instantiate and wire up the application without starting it.
    pub fn assemble(&self, boot: &Bootstrap, lookup: &dyn ClassLookup) -> BootstrapResult<Pipeline<F::Runner>> {
        let class_name = boot.resolved_app_class();
        let class = resolver::resolve(lookup, &class_name).inspect_err(|_| {
            tracing::error!(class = %class_name, "Application class not found");
        })?;

        let app = class.instantiate();
        let args = boot.raw_args();

        let mut runner = self
            .factory
            .create(args.clone(), app.clone())
            .map_err(BootstrapError::collaborator)?;

        let chain = self
            .builder
            .build(&class, app.clone())
            .map_err(BootstrapError::collaborator)?;
        runner.set_app(chain);

        let plugins = app.plugins();
        let plugin_names: Vec<String> = plugins.iter().map(|p| p.name().to_string()).collect();
        runner.load_plugins(plugins).map_err(BootstrapError::collaborator)?;

        tracing::debug!(
            class = %class,
            args = ?args,
            plugins = ?plugin_names,
            "Pipeline assembled"
        );

        Ok(Pipeline {
            class,
            app,
            args,
            plugins: plugin_names,
            runner,
        })
    }

    /// Assemble and launch.
    pub fn run(&self, boot: &Bootstrap, lookup: &dyn ClassLookup) -> BootstrapResult<()> {
        self.assemble(boot, lookup)?.launch()
    }
}
