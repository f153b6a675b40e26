//! Bootstrap context.
//!
//! # Data Flow
//! ```text
//! Bootstrap::builder() / Bootstrap::from_config()
//!     → StackInspector (invoking file, entry point)      [memoized]
//!     → paths.rs (app_path, root_path)                    [memoized]
//!     → application class name (explicit or derived)      [frozen on first resolve]
//!     → run-on-exit flag
//!     → lifecycle::exit (finalize) → pipeline::PipelineAssembler
//! ```
//!
//! # Design Decisions
//! - One explicit context object instead of process-wide globals
//! - Cached facts use `OnceLock`: computed at most once, then read-only,
//!   and concurrent first access converges on a single value
//! - The class name stays writable until the resolver first reads it

pub mod environment;
pub mod paths;
pub mod process;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

pub use environment::{Environment, EnvironmentIndicator, UnknownEnvironment};
pub use process::{OsProcess, ProcessInfo, StaticProcess};

use crate::config::{loader, BootstrapConfig};
use crate::error::{BootstrapError, BootstrapResult};
use crate::resolver::naming::class_name_for_file;
use crate::stack::{BacktraceFrameSource, CallFrame, FrameSource, IgnorePatternSet, StackInspector};

#[derive(Debug, Default)]
struct AppClassState {
    name: Option<String>,
    frozen: bool,
}

/// Process bootstrap state: caller discovery, cached paths, the application
/// class name and the run-on-exit flag.
pub struct Bootstrap {
    inspector: StackInspector,
    process: Arc<dyn ProcessInfo>,
    environment: Arc<dyn EnvironmentIndicator>,
    invoking_file: OnceLock<PathBuf>,
    entry_point: OnceLock<PathBuf>,
    app_path: OnceLock<PathBuf>,
    root_path: OnceLock<PathBuf>,
    app_class: Mutex<AppClassState>,
    run_on_exit: AtomicBool,
    finalized: AtomicBool,
}

impl Bootstrap {
    /// Context for the running process with default settings. The process
    /// environment is not consulted.
    pub fn new() -> Self {
        BootstrapBuilder::default().build()
    }

    pub fn builder() -> BootstrapBuilder {
        BootstrapBuilder::default()
    }

    /// Context for the running process configured from `config`.
    ///
    /// `config` is used as given; see [`Bootstrap::from_env`] for the
    /// `LIFTOFF_*` overrides.
    pub fn from_config(config: &BootstrapConfig) -> BootstrapResult<Self> {
        Ok(Self::builder().config(config)?.build())
    }

    /// Context for the running process: defaults, then `LIFTOFF_ENV`,
    /// `LIFTOFF_APP_CLASS` and `LIFTOFF_IGNORE_CALLERS` from the environment.
    pub fn from_env() -> BootstrapResult<Self> {
        Self::from_env_with(BootstrapConfig::default())
    }

    /// Like [`Bootstrap::from_env`], starting from a loaded configuration.
    pub fn from_env_with(config: BootstrapConfig) -> BootstrapResult<Self> {
        let config = loader::apply_env_overrides(config)?;
        Self::from_config(&config)
    }

    /// Caller locations outside the framework, innermost first.
    pub fn caller_locations(&self) -> impl Iterator<Item = CallFrame> + '_ {
        self.inspector.caller_locations()
    }

    /// Like `caller_locations`, file names only.
    pub fn caller_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.inspector.caller_files()
    }

    /// The file that invoked the framework.
    ///
    /// First non-framework caller; the process entry point when the stack has
    /// none. Computed once.
    pub fn invoking_file(&self) -> &Path {
        self.invoking_file.get_or_init(|| {
            let file = self
                .caller_files()
                .find(|f| !f.as_os_str().is_empty())
                .unwrap_or_else(|| self.entry_point().to_path_buf());
            tracing::debug!(file = %file.display(), "Resolved invoking file");
            file
        })
    }

    /// The source file of the program's `main`, or `argv[0]` when the stack
    /// carries no location for it. Computed once.
    pub fn entry_point(&self) -> &Path {
        self.entry_point.get_or_init(|| {
            self.inspector
                .entry_frame()
                .map(|frame| frame.file)
                .unwrap_or_else(|| self.process.entry_point())
        })
    }

    /// The explicitly set (or, after resolution, the derived) class name.
    pub fn app_class(&self) -> Option<String> {
        self.class_state().name.clone()
    }

    /// Set the application class by name or handle.
    ///
    /// Fails once the resolver has used the name and `name` differs from it.
    pub fn set_app_class(&self, name: impl ToString) -> BootstrapResult<()> {
        let requested = name.to_string();
        let mut state = self.class_state();
        if state.frozen {
            return match &state.name {
                Some(current) if *current == requested => Ok(()),
                current => Err(BootstrapError::AppClassFrozen {
                    current: current.clone().unwrap_or_default(),
                    requested,
                }),
            };
        }
        state.name = Some(requested);
        Ok(())
    }

    /// The class name the resolver uses; derives it from the invoking file
    /// when unset and freezes it.
    pub fn resolved_app_class(&self) -> String {
        let mut state = self.class_state();
        let name = match &state.name {
            Some(name) => name.clone(),
            None => {
                let derived = class_name_for_file(self.invoking_file());
                tracing::debug!(class = %derived, "Derived application class from invoking file");
                derived
            }
        };
        state.name = Some(name.clone());
        state.frozen = true;
        name
    }

    pub fn run_on_exit(&self) -> bool {
        self.run_on_exit.load(Ordering::SeqCst)
    }

    /// Arm or disarm launching at finalize.
    pub fn set_run_on_exit(&self, enabled: bool) {
        self.run_on_exit.store(enabled, Ordering::SeqCst);
    }

    /// Raw process arguments, passed to the runner unparsed.
    pub fn raw_args(&self) -> Vec<String> {
        self.process.args()
    }

    pub fn is_test_environment(&self) -> bool {
        self.environment.is_test()
    }

    pub(crate) fn process(&self) -> &dyn ProcessInfo {
        self.process.as_ref()
    }

    /// Marks the context finalized; returns false if it already was.
    pub(crate) fn begin_finalize(&self) -> bool {
        !self.finalized.swap(true, Ordering::SeqCst)
    }

    fn class_state(&self) -> std::sync::MutexGuard<'_, AppClassState> {
        self.app_class.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrap")
            .field("invoking_file", &self.invoking_file.get())
            .field("app_class", &self.class_state().name)
            .field("run_on_exit", &self.run_on_exit())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Bootstrap`].
pub struct BootstrapBuilder {
    frame_source: Arc<dyn FrameSource>,
    ignore: IgnorePatternSet,
    process: Arc<dyn ProcessInfo>,
    environment: Arc<dyn EnvironmentIndicator>,
    app_class: Option<String>,
    run_on_exit: bool,
}

impl Default for BootstrapBuilder {
    fn default() -> Self {
        Self {
            frame_source: Arc::new(BacktraceFrameSource),
            ignore: IgnorePatternSet::framework(),
            process: Arc::new(OsProcess),
            environment: Arc::new(Environment::default()),
            app_class: None,
            run_on_exit: true,
        }
    }
}

impl BootstrapBuilder {
    pub fn frame_source(mut self, source: impl FrameSource + 'static) -> Self {
        self.frame_source = Arc::new(source);
        self
    }

    pub fn ignore_patterns(mut self, ignore: IgnorePatternSet) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn process(mut self, process: Arc<dyn ProcessInfo>) -> Self {
        self.process = process;
        self
    }

    pub fn environment(mut self, environment: impl EnvironmentIndicator + 'static) -> Self {
        self.environment = Arc::new(environment);
        self
    }

    pub fn app_class(mut self, name: impl ToString) -> Self {
        self.app_class = Some(name.to_string());
        self
    }

    pub fn run_on_exit(mut self, enabled: bool) -> Self {
        self.run_on_exit = enabled;
        self
    }

    /// Apply a configuration: extra ignore patterns, environment,
    /// run-on-exit and, when set, the class name.
    pub fn config(mut self, config: &BootstrapConfig) -> BootstrapResult<Self> {
        self.ignore = IgnorePatternSet::with_extra(&config.stack.ignore_patterns)?;
        self.environment = Arc::new(config.application.environment);
        self.run_on_exit = config.application.run_on_exit;
        if let Some(class) = &config.application.class {
            self.app_class = Some(class.clone());
        }
        Ok(self)
    }

    pub fn build(self) -> Bootstrap {
        Bootstrap {
            inspector: StackInspector::new(self.frame_source, self.ignore),
            process: self.process,
            environment: self.environment,
            invoking_file: OnceLock::new(),
            entry_point: OnceLock::new(),
            app_path: OnceLock::new(),
            root_path: OnceLock::new(),
            app_class: Mutex::new(AppClassState {
                name: self.app_class,
                frozen: false,
            }),
            run_on_exit: AtomicBool::new(self.run_on_exit),
            finalized: AtomicBool::new(false),
        }
    }
}
