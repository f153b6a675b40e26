//! Call stack inspection subsystem.
//!
//! # Data Flow
//! ```text
//! FrameSource (source.rs)
//!     → raw entries "<file>:<line>[:in <method>]", innermost first
//!     → frame.rs (split into file / line / method)
//!     → ignore.rs (drop framework, cargo and std frames)
//!     → CallFrame sequence; first entry is the invoking file
//! ```
//!
//! # Design Decisions
//! - The stack is captured through an injected `FrameSource`, so filtering
//!   is testable without a real backtrace
//! - Each query captures once and yields a lazy, single-pass iterator
//! - An empty result is valid; callers fall back to the entry point

pub mod frame;
pub mod ignore;
pub mod source;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use frame::CallFrame;
pub use ignore::IgnorePatternSet;
pub use source::{BacktraceFrameSource, FrameSource, StaticFrameSource};

use frame::parse_raw_entry;

/// Finds caller locations outside the framework.
#[derive(Clone)]
pub struct StackInspector {
    source: Arc<dyn FrameSource>,
    ignore: IgnorePatternSet,
}

impl StackInspector {
    pub fn new(source: Arc<dyn FrameSource>, ignore: IgnorePatternSet) -> Self {
        Self { source, ignore }
    }

    /// Caller locations with ignorable frames removed, innermost first.
    pub fn caller_locations(&self) -> impl Iterator<Item = CallFrame> + '_ {
        let raw = self.source.raw_frames();
        raw.into_iter().filter_map(move |entry| {
            let frame = parse_raw_entry(&entry).into_call_frame();
            (!self.ignore.is_ignored(&frame.file)).then_some(frame)
        })
    }

    /// Like `caller_locations`, file names only.
    pub fn caller_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.caller_locations().map(|frame| frame.file)
    }

    /// The outermost non-ignorable frame running a `main` function.
    ///
    /// This is the source file the process was started from.
    pub fn entry_frame(&self) -> Option<CallFrame> {
        let raw = self.source.raw_frames();
        raw.iter().rev().find_map(|entry| {
            let frame = parse_raw_entry(entry);
            let is_main = frame.method.is_some_and(|m| m.ends_with("::main"));
            if is_main && !self.ignore.is_ignored(Path::new(frame.file)) {
                Some(frame.into_call_frame())
            } else {
                None
            }
        })
    }

    pub fn ignore_patterns(&self) -> &IgnorePatternSet {
        &self.ignore
    }
}

impl std::fmt::Debug for StackInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackInspector")
            .field("ignore", &self.ignore)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspector(frames: &[&str]) -> StackInspector {
        StackInspector::new(
            Arc::new(StaticFrameSource::new(frames.iter().copied())),
            IgnorePatternSet::framework(),
        )
    }

    #[test]
    fn test_filters_framework_frames_in_order() {
        let inspector = inspector(&[
            "/home/dev/.cargo/registry/src/index.crates.io-6f17d22bba15001f/liftoff-0.1.0/src/stack/source.rs:24:21:in liftoff::stack::source::BacktraceFrameSource::raw_frames",
            "/home/dev/.cargo/registry/src/index.crates.io-6f17d22bba15001f/liftoff-0.1.0/src/bootstrap/mod.rs:80:9:in liftoff::bootstrap::Bootstrap::invoking_file",
            "/srv/my_api/src/app/routes.rs:8:5:in my_api::app::setup",
            "/srv/my_api/src/main.rs:12:5:in my_api::main",
            "/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/std/src/rt.rs:195:17:in std::rt::lang_start",
        ]);

        let frames: Vec<CallFrame> = inspector.caller_locations().collect();
        assert_eq!(
            frames,
            vec![
                CallFrame::new("/srv/my_api/src/app/routes.rs", Some(8)),
                CallFrame::new("/srv/my_api/src/main.rs", Some(12)),
            ]
        );

        let files: Vec<PathBuf> = inspector.caller_files().collect();
        assert_eq!(files, vec![PathBuf::from("/srv/my_api/src/app/routes.rs"), PathBuf::from("/srv/my_api/src/main.rs")]);
    }

    #[test]
    fn test_all_ignored_is_empty() {
        let inspector = inspector(&["/home/dev/.cargo/registry/src/index.crates.io-6f17d22bba15001f/liftoff-0.1.0/src/stack/mod.rs:1:1", "<unknown>"]);
        assert_eq!(inspector.caller_locations().count(), 0);
    }

    #[test]
    fn test_entry_frame_is_outermost_main() {
        let inspector = inspector(&[
            "/home/dev/.cargo/registry/src/index.crates.io-6f17d22bba15001f/liftoff-0.1.0/src/lifecycle/exit.rs:40:9:in liftoff::lifecycle::exit::finalize",
            "/srv/my_api/src/main.rs:20:5:in my_api::main::{{closure}}",
            "/srv/my_api/src/main.rs:18:5:in my_api::main",
            "/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/std/src/rt.rs:195:17:in std::rt::lang_start",
        ]);
        assert_eq!(inspector.entry_frame(), Some(CallFrame::new("/srv/my_api/src/main.rs", Some(18))));
    }

    #[test]
    fn test_no_entry_frame() {
        let inspector = inspector(&["/srv/my_api/src/app/routes.rs:8:5:in my_api::app::setup"]);
        assert_eq!(inspector.entry_frame(), None);
    }
}
