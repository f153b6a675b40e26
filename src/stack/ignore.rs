//! Frame ignore patterns.
//!
//! # Responsibilities
//! - Hold the built-in patterns for framework, dependency-manager and
//!   runtime-internal frames
//! - Accept extra patterns from configuration or the environment
//! - Decide whether a frame's file is ignorable
//!
//! # Design Decisions
//! - Patterns are regular expressions matched against the lossy UTF-8 path
//! - Order is preserved; extra patterns are appended after the built-ins
//! - Both `/` and `\` separators are recognised

use std::path::Path;

use regex::Regex;

use crate::error::{BootstrapError, BootstrapResult};

/// Built-in patterns for frames that never name the invoking file.
pub const FRAMEWORK_PATTERNS: &[&str] = &[
    // this crate, when built as a dependency or from its own checkout
    r"(^|[/\\])liftoff(-[0-9][^/\\]*)?[/\\]src[/\\]",
    // cargo registry and git checkouts
    r"[/\\]\.cargo[/\\](registry|git)[/\\]",
    // standard library, remapped or from a local toolchain
    r"^/rustc/[0-9a-f]+/",
    r"(^|[/\\])library[/\\](std|core|alloc)[/\\]src[/\\]",
    // pseudo paths such as <unknown>
    r"^<",
];

const MANIFEST_DIR: &str = env!("CARGO_MANIFEST_DIR");

/// Relative source paths, only meaningful when the working directory is
/// this crate's checkout.
const CHECKOUT_RELATIVE_PATTERN: &str = r"^(\.[/\\])?src[/\\]";

fn running_from_checkout() -> bool {
    std::env::current_dir().is_ok_and(|dir| dir == Path::new(MANIFEST_DIR))
}

/// Ordered set of path patterns for frames to skip.
#[derive(Debug, Clone)]
pub struct IgnorePatternSet {
    patterns: Vec<Regex>,
}

impl IgnorePatternSet {
    /// An empty set; every frame is kept.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// The built-in framework patterns.
    ///
    /// Besides [`FRAMEWORK_PATTERNS`] this covers the crate's own source tree
    /// by its absolute path, and relative `src/` frames when the process runs
    /// from the crate's checkout (backtraces print paths relative to the
    /// working directory).
    pub fn framework() -> Self {
        let mut sources: Vec<String> = FRAMEWORK_PATTERNS.iter().map(|p| p.to_string()).collect();
        sources.push(format!(r"^{}[/\\]src[/\\]", regex::escape(MANIFEST_DIR)));
        if running_from_checkout() {
            sources.push(CHECKOUT_RELATIVE_PATTERN.to_string());
        }

        let patterns = sources.iter().filter_map(|p| Regex::new(p).ok()).collect();
        Self { patterns }
    }

    /// The built-in patterns followed by `extra`.
    pub fn with_extra<I, S>(extra: I) -> BootstrapResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::framework();
        for pattern in extra {
            set.push(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Append a pattern.
    pub fn push(&mut self, pattern: &str) -> BootstrapResult<()> {
        let regex = Regex::new(pattern).map_err(|source| BootstrapError::IgnorePattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.patterns.push(regex);
        Ok(())
    }

    /// Returns true if any pattern matches `file`.
    pub fn is_ignored(&self, file: &Path) -> bool {
        let file = file.to_string_lossy();
        self.patterns.iter().any(|p| p.is_match(&file))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

impl Default for IgnorePatternSet {
    fn default() -> Self {
        Self::framework()
    }
}
