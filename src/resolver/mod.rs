//! Application class resolution.
//!
//! # Data Flow
//! ```text
//! explicit class name ─────────────┐
//! invoking file → naming.rs ───────┴→ qualified name "Foo::Bar"
//!     → registry.rs (walk "Foo", then "Bar" from the root)
//!     → AppClass or ClassNotFound("Foo::Bar")
//! ```

pub mod naming;
pub mod registry;

pub use naming::{camel_case, class_name_for_file};
pub use registry::{AppClass, AppRegistry, ClassLookup};

use crate::error::{BootstrapError, BootstrapResult};

/// Separator between namespace segments of a class name.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Resolve a qualified class name.
pub fn resolve(lookup: &dyn ClassLookup, name: &str) -> BootstrapResult<AppClass> {
    lookup.lookup(name).ok_or_else(|| BootstrapError::ClassNotFound {
        name: name.to_string(),
    })
}
