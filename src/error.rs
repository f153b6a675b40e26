//! Crate-wide error type.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Boxed error produced by a collaborator (runner, middleware builder, plugin).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the bootstrap layer.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The application class name did not resolve to a registered class.
    #[error("Class {name} not found.")]
    ClassNotFound { name: String },

    /// The class name was changed after the resolver already used it.
    #[error("application class is frozen as {current}; cannot change it to {requested}")]
    AppClassFrozen { current: String, requested: String },

    /// A class with the same qualified name is already registered.
    #[error("class {name} is already registered")]
    DuplicateClass { name: String },

    /// A registration name is empty or contains an empty segment.
    #[error("invalid class name {name:?}")]
    InvalidClassName { name: String },

    /// An ignore pattern failed to compile.
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    IgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure raised by a collaborator, passed through untouched.
    #[error(transparent)]
    Collaborator(BoxError),
}

impl BootstrapError {
    /// Wrap a collaborator failure without altering its message or source chain.
    pub fn collaborator(err: BoxError) -> Self {
        BootstrapError::Collaborator(err)
    }

    /// Returns true if this is a class resolution failure.
    pub fn is_class_not_found(&self) -> bool {
        matches!(self, BootstrapError::ClassNotFound { .. })
    }
}

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
