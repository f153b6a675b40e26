//! Minimal application: the class name is derived from this file's name.
//!
//! ```text
//! cargo run --example my_sample_app -- -p 9000
//! curl localhost:9000/
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use liftoff::{AppRegistry, Application, Bootstrap, BoxError, Middleware};
use serde_json::json;

#[derive(Default)]
struct MySampleApp;

impl Application for MySampleApp {
    fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .route("/", get(|| async { "Hello from MySampleApp" }))
            .route("/status", get(|| async { Json(json!({ "status": "ok" })) }))
    }

    fn middleware(&self) -> Vec<Middleware> {
        vec![Middleware::Timeout(Duration::from_secs(10))]
    }
}

fn main() -> Result<(), BoxError> {
    let boot = Bootstrap::from_env()?;

    let mut registry = AppRegistry::new();
    let setup = registry
        .register::<MySampleApp>("MySampleApp")
        .map(|_| ())
        .map_err(BoxError::from);

    boot.finish(setup, &registry, &liftoff::http_assembler())?;
    Ok(())
}
