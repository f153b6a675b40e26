//! Process facts the bootstrap layer reads: entry point, working directory
//! and raw arguments.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Capability exposing process-level facts.
pub trait ProcessInfo: Send + Sync {
    /// Path the process was started from (`argv[0]`).
    fn entry_point(&self) -> PathBuf;

    /// Current working directory.
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Raw command line arguments, program name excluded.
    fn args(&self) -> Vec<String>;
}

/// The running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcess;

impl ProcessInfo for OsProcess {
    fn entry_point(&self) -> PathBuf {
        std::env::args_os()
            .next()
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| std::env::current_exe().ok())
            .unwrap_or_default()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn args(&self) -> Vec<String> {
        std::env::args_os()
            .skip(1)
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Fixed process facts with a changeable working directory.
#[derive(Debug)]
pub struct StaticProcess {
    entry_point: PathBuf,
    current_dir: Mutex<PathBuf>,
    args: Vec<String>,
}

impl StaticProcess {
    pub fn new(entry_point: impl Into<PathBuf>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            entry_point: entry_point.into(),
            current_dir: Mutex::new(current_dir.into()),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Simulate `chdir`.
    pub fn set_current_dir(&self, dir: impl Into<PathBuf>) {
        *self.current_dir.lock().unwrap_or_else(PoisonError::into_inner) = dir.into();
    }
}

impl ProcessInfo for StaticProcess {
    fn entry_point(&self) -> PathBuf {
        self.entry_point.clone()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.current_dir.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn args(&self) -> Vec<String> {
        self.args.clone()
    }
}
