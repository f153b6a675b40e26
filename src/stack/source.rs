//! Stack frame sources.
//!
//! A `FrameSource` yields raw entries innermost first, each formatted as
//! `<file>:<line>[:<col>][:in <method>]`.

use std::backtrace::{Backtrace, BacktraceStatus};

/// Capability that captures the current call stack.
pub trait FrameSource: Send + Sync {
    /// Raw entries for the current stack, innermost first.
    fn raw_frames(&self) -> Vec<String>;
}

/// Captures frames through `std::backtrace`.
///
/// Frames without debug location information are dropped. When the binary
/// carries no debug info at all the result is empty and callers fall back to
/// the executable path.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceFrameSource;

impl FrameSource for BacktraceFrameSource {
    fn raw_frames(&self) -> Vec<String> {
        let trace = Backtrace::force_capture();
        if trace.status() != BacktraceStatus::Captured {
            return Vec::new();
        }
        render_backtrace(&trace.to_string())
    }
}

/// A fixed list of raw entries.
#[derive(Debug, Clone, Default)]
pub struct StaticFrameSource {
    frames: Vec<String>,
}

impl StaticFrameSource {
    pub fn new<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
        }
    }
}

impl FrameSource for StaticFrameSource {
    fn raw_frames(&self) -> Vec<String> {
        self.frames.clone()
    }
}

/// Convert the `Display` form of a backtrace into raw entries.
///
/// ```text
///    3: my_api::main
///              at ./src/main.rs:12:5
/// ```
/// becomes `./src/main.rs:12:5:in my_api::main`.
pub(crate) fn render_backtrace(text: &str) -> Vec<String> {
    let mut frames = Vec::new();
    let mut symbol: Option<&str> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            match symbol {
                Some(sym) => frames.push(format!("{location}:in {sym}")),
                None => frames.push(location.to_string()),
            }
        } else if let Some((index, name)) = line.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                symbol = Some(strip_hash(name.trim()));
            }
        }
    }

    frames
}

/// Drop a trailing `::h0123456789abcdef` symbol hash.
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => head,
        _ => symbol,
    }
}
