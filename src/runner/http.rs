//! HTTP runner: serves an application's handler chain with axum.
//!
//! # Responsibilities
//! - Parse the raw process arguments into settings
//! - Start plugins before accepting traffic
//! - Serve until SIGINT/SIGTERM, then broadcast shutdown to plugins
//!
//! # Design Decisions
//! - Owns its own multi-threaded tokio runtime; bootstrap stays synchronous
//! - Plugin start failures abort startup unchanged
//! - Listener binds last (traffic only when ready)
//! - Server-wide timeout and body limit from `[server]` wrap the whole chain

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::BootstrapConfig;
use crate::error::BoxError;
use crate::lifecycle::{shutdown_signal, Shutdown};
use crate::observability::{logging, metrics};
use crate::pipeline::{Application, Middleware, PluginContext, PluginDescriptor, Runner, RunnerFactory};
use crate::runner::args::RunnerArgs;
use crate::runner::middleware;

/// Errors raised by the HTTP runner itself.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no handler chain attached to the runner")]
    NoChain,

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),
}

/// Creates [`HttpRunner`]s from raw command line arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRunnerFactory;

impl RunnerFactory for HttpRunnerFactory {
    type Runner = HttpRunner;

    fn create(&self, args: Vec<String>, app: Arc<dyn Application>) -> Result<HttpRunner, BoxError> {
        let cli = RunnerArgs::parse_raw(&args)?;
        let settings = cli.settings()?;
        Ok(HttpRunner::new(settings, app).with_verbose(cli.verbose))
    }
}

/// Serves a handler chain over HTTP.
pub struct HttpRunner {
    settings: BootstrapConfig,
    verbose: bool,
    app: Arc<dyn Application>,
    chain: Option<Router>,
    plugins: Vec<PluginDescriptor>,
}

impl HttpRunner {
    pub fn new(settings: BootstrapConfig, app: Arc<dyn Application>) -> Self {
        Self {
            settings,
            verbose: false,
            app,
            chain: None,
            plugins: Vec::new(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn settings(&self) -> &BootstrapConfig {
        &self.settings
    }

    pub fn app(&self) -> &Arc<dyn Application> {
        &self.app
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    pub fn has_chain(&self) -> bool {
        self.chain.is_some()
    }

    /// `address:port` from the settings.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.settings.server.address, self.settings.server.port)
    }

    /// Start plugins, then serve on `listener` until `signal` resolves.
    pub async fn serve<S>(self, listener: TcpListener, signal: S) -> Result<(), BoxError>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let chain = self.chain.ok_or(RunnerError::NoChain)?;
        let server = &self.settings.server;
        let limits = [
            Middleware::Timeout(Duration::from_secs(server.request_timeout_secs)),
            Middleware::BodyLimit(server.max_body_bytes),
        ];
        let chain = limits.into_iter().rev().fold(chain, middleware::apply);
        let local_addr = listener.local_addr()?;

        let shutdown = Shutdown::new();
        for descriptor in &self.plugins {
            let ctx = PluginContext {
                port: local_addr.port(),
                environment: self.settings.application.environment,
                options: descriptor.options().clone(),
                shutdown: shutdown.subscribe(),
            };
            descriptor.plugin().start(ctx)?;
            tracing::info!(plugin = descriptor.name(), "Plugin started");
        }

        tracing::info!(
            address = %local_addr,
            environment = %self.settings.application.environment,
            "Listening for connections"
        );

        let served = axum::serve(listener, chain.into_make_service())
            .with_graceful_shutdown(signal)
            .await;
        shutdown.trigger();
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl Runner for HttpRunner {
    type Chain = Router;

    fn set_app(&mut self, chain: Router) {
        self.chain = Some(chain);
    }

    fn load_plugins(&mut self, plugins: Vec<PluginDescriptor>) -> Result<(), BoxError> {
        for plugin in &plugins {
            tracing::debug!(plugin = plugin.name(), "Plugin registered");
        }
        self.plugins.extend(plugins);
        Ok(())
    }

    fn run(self) -> Result<(), BoxError> {
        logging::init_logging(&self.settings.observability, self.verbose);

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        runtime.block_on(async move {
            let observability = &self.settings.observability;
            if observability.metrics_enabled {
                let addr: SocketAddr = observability
                    .metrics_address
                    .parse()
                    .map_err(|_| RunnerError::MetricsAddress(observability.metrics_address.clone()))?;
                metrics::init_metrics(addr)?;
            }

            let address = self.bind_address();
            let listener = TcpListener::bind(&address)
                .await
                .map_err(|source| RunnerError::Bind { address, source })?;

            self.serve(listener, shutdown_signal()).await
        })
    }
}

impl std::fmt::Debug for HttpRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRunner")
            .field("bind_address", &self.bind_address())
            .field("has_chain", &self.chain.is_some())
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}
