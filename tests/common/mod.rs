//! Shared fixtures for integration tests: recording collaborators, sample
//! applications and bootstrap contexts with fixed stacks.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::routing::get;
use axum::Router;
use liftoff::bootstrap::{Bootstrap, StaticProcess};
use liftoff::pipeline::{MiddlewareBuilder, Runner, RunnerFactory};
use liftoff::resolver::AppClass;
use liftoff::stack::StaticFrameSource;
use liftoff::{Application, BoxError, Plugin, PluginContext, PluginDescriptor};

/// Everything the recording collaborators observed, in call order.
#[derive(Debug, Default)]
pub struct Journal {
    pub events: Mutex<Vec<String>>,
    pub args: Mutex<Option<Vec<String>>>,
    pub plugins: Mutex<Vec<String>>,
}

impl Journal {
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// A runner that records instead of serving.
pub struct RecordingRunner {
    journal: Arc<Journal>,
    chain: Option<String>,
    fail_run: Option<String>,
}

impl Runner for RecordingRunner {
    type Chain = String;

    fn set_app(&mut self, chain: String) {
        self.journal.record(format!("set_app:{chain}"));
        self.chain = Some(chain);
    }

    fn load_plugins(&mut self, plugins: Vec<PluginDescriptor>) -> Result<(), BoxError> {
        let names: Vec<String> = plugins.iter().map(|p| p.name().to_string()).collect();
        self.journal.record(format!("load_plugins:{}", names.len()));
        *self.journal.plugins.lock().unwrap() = names;
        Ok(())
    }

    fn run(self) -> Result<(), BoxError> {
        self.journal.record("run");
        match self.fail_run {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub journal: Arc<Journal>,
    pub fail_create: Option<String>,
    pub fail_run: Option<String>,
}

impl RunnerFactory for RecordingFactory {
    type Runner = RecordingRunner;

    fn create(&self, args: Vec<String>, _app: Arc<dyn Application>) -> Result<RecordingRunner, BoxError> {
        if let Some(message) = &self.fail_create {
            return Err(message.clone().into());
        }
        self.journal.record("create");
        *self.journal.args.lock().unwrap() = Some(args);
        Ok(RecordingRunner {
            journal: self.journal.clone(),
            chain: None,
            fail_run: self.fail_run.clone(),
        })
    }
}

/// Builds a "chain" that names the class it was built for.
#[derive(Clone, Default)]
pub struct RecordingBuilder {
    pub journal: Arc<Journal>,
}

impl MiddlewareBuilder for RecordingBuilder {
    type Chain = String;

    fn build(&self, class: &AppClass, _app: Arc<dyn Application>) -> Result<String, BoxError> {
        self.journal.record(format!("build:{class}"));
        Ok(format!("chain<{class}>"))
    }
}

/// Plain application with no plugins.
#[derive(Default)]
pub struct MySampleApp;

impl Application for MySampleApp {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route("/", get(|| async { "sample" }))
    }
}

/// Counts plugin starts.
#[derive(Default)]
pub struct CountingPlugin {
    pub starts: Arc<AtomicUsize>,
}

impl Plugin for CountingPlugin {
    fn start(&self, _ctx: PluginContext) -> Result<(), BoxError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Application declaring two plugins.
#[derive(Default)]
pub struct PluggedApp;

impl Application for PluggedApp {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route("/", get(|| async { "plugged" }))
    }

    fn plugins(&self) -> Vec<PluginDescriptor> {
        vec![
            PluginDescriptor::new("metrics_reporter", CountingPlugin::default()),
            PluginDescriptor::new("cache_warmer", CountingPlugin::default()),
        ]
    }
}

/// A bootstrap context whose stack is `frames` and whose process was
/// started as `entry` with `args`.
pub fn bootstrap(frames: &[&str], entry: &str, args: &[&str]) -> Bootstrap {
    Bootstrap::builder()
        .frame_source(StaticFrameSource::new(frames.iter().copied()))
        .process(Arc::new(
            StaticProcess::new(entry, "/srv/app").with_args(args.iter().copied()),
        ))
        .build()
}
