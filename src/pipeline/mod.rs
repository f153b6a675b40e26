//! Pipeline assembly subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap (class name, raw args) + ClassLookup
//!     → assembler.rs: resolve → instantiate
//!     → RunnerFactory::create(args, app)
//!     → MiddlewareBuilder::build(class, app) → Runner::set_app
//!     → Application::plugins() → Runner::load_plugins
//!     → Runner::run (terminal)
//! ```

pub mod application;
pub mod assembler;
pub mod collaborators;

pub use application::{Application, Middleware, Plugin, PluginContext, PluginDescriptor};
pub use assembler::{Pipeline, PipelineAssembler};
pub use collaborators::{MiddlewareBuilder, Runner, RunnerFactory};
