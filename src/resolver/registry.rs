//! Registry of application classes.
//!
//! # Responsibilities
//! - Map `::`-namespaced names to constructible application classes
//! - Resolve a qualified name segment by segment from the root
//!
//! # Design Decisions
//! - Registration is explicit; the host program registers its classes
//!   before finalizing
//! - Intermediate segments become namespaces on demand; a class may also
//!   act as a namespace for nested classes
//! - Lookups never construct anything

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BootstrapError, BootstrapResult};
use crate::pipeline::Application;
use crate::resolver::NAMESPACE_SEPARATOR;

/// A registered application class: its qualified name and constructor.
#[derive(Clone)]
pub struct AppClass {
    name: Arc<str>,
    construct: fn() -> Arc<dyn Application>,
}

fn construct<T: Application + Default>() -> Arc<dyn Application> {
    Arc::new(T::default())
}

impl AppClass {
    /// Class handle for `T` under `name`.
    pub fn of<T: Application + Default>(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            construct: construct::<T>,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create an instance with no arguments.
    pub fn instantiate(&self) -> Arc<dyn Application> {
        (self.construct)()
    }
}

impl fmt::Display for AppClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for AppClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AppClass").field(&self.name).finish()
    }
}

/// Capability to find a class by qualified name.
pub trait ClassLookup {
    fn lookup(&self, qualified_name: &str) -> Option<AppClass>;
}

#[derive(Debug, Default)]
struct Entry {
    class: Option<AppClass>,
    children: BTreeMap<String, Entry>,
}

/// Namespaced registry of application classes.
#[derive(Debug, Default)]
pub struct AppRegistry {
    root: Entry,
    len: usize,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name` (e.g. `"Api::V1"`).
    pub fn register<T: Application + Default>(&mut self, name: &str) -> BootstrapResult<AppClass> {
        let segments: Vec<&str> = name.split(NAMESPACE_SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(BootstrapError::InvalidClassName { name: name.to_string() });
        }

        let mut entry = &mut self.root;
        for segment in segments {
            entry = entry.children.entry(segment.to_string()).or_default();
        }
        if entry.class.is_some() {
            return Err(BootstrapError::DuplicateClass { name: name.to_string() });
        }

        let class = AppClass::of::<T>(name);
        entry.class = Some(class.clone());
        self.len += 1;
        tracing::debug!(class = %name, "Registered application class");
        Ok(class)
    }

    /// Builder-style `register`.
    pub fn with<T: Application + Default>(mut self, name: &str) -> BootstrapResult<Self> {
        self.register::<T>(name)?;
        Ok(self)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Qualified names of every registered class, sorted.
    pub fn class_names(&self) -> Vec<String> {
        fn walk(entry: &Entry, names: &mut Vec<String>) {
            if let Some(class) = &entry.class {
                names.push(class.name().to_string());
            }
            for child in entry.children.values() {
                walk(child, names);
            }
        }
        let mut names = Vec::with_capacity(self.len);
        walk(&self.root, &mut names);
        names.sort();
        names
    }
}

impl ClassLookup for AppRegistry {
    fn lookup(&self, qualified_name: &str) -> Option<AppClass> {
        let mut entry = &self.root;
        for segment in qualified_name.split(NAMESPACE_SEPARATOR) {
            entry = entry.children.get(segment)?;
        }
        entry.class.clone()
    }
}
