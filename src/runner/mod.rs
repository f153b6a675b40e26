//! Bundled collaborators: an axum HTTP runner and its middleware builder.
//!
//! # Data Flow
//! ```text
//! raw args → args.rs (clap) → settings (config file + env + flags)
//! Application::routes() → middleware.rs (tower-http layers) → Router
//! http.rs: plugins start → axum::serve(Router) → shutdown broadcast
//! ```

pub mod args;
pub mod http;
pub mod middleware;

pub use args::RunnerArgs;
pub use http::{HttpRunner, HttpRunnerFactory, RunnerError};
pub use middleware::{LayeredBuilder, MakeRequestUuid, X_REQUEST_ID};

use crate::pipeline::PipelineAssembler;

/// Assembler wired to the bundled HTTP runner and middleware builder.
pub type HttpAssembler = PipelineAssembler<HttpRunnerFactory, LayeredBuilder>;

/// The default assembler.
pub fn http_assembler() -> HttpAssembler {
    PipelineAssembler::new(HttpRunnerFactory, LayeredBuilder::default())
}
