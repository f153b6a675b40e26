//! Application bootstrap: discovers the program that invoked the framework,
//! derives and resolves its application class, and launches the serving
//! pipeline when that program finishes its setup.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod resolver;
pub mod runner;
pub mod stack;

pub use bootstrap::{Bootstrap, Environment};
pub use config::BootstrapConfig;
pub use error::{BootstrapError, BootstrapResult, BoxError};
pub use lifecycle::{ExitDecision, SkipReason};
pub use pipeline::{Application, Middleware, Plugin, PluginContext, PluginDescriptor, PipelineAssembler};
pub use resolver::{AppClass, AppRegistry, ClassLookup};
pub use runner::{http_assembler, HttpAssembler};
