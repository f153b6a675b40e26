//! Raw stack entry parsing.

use std::path::PathBuf;

/// A single caller location: the source file and line of a stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub file: PathBuf,
    pub line: Option<u32>,
}

impl CallFrame {
    pub fn new(file: impl Into<PathBuf>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// A parsed raw entry, keeping the method token for entry point detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawFrame<'a> {
    pub file: &'a str,
    pub line: Option<u32>,
    pub method: Option<&'a str>,
}

impl RawFrame<'_> {
    pub fn into_call_frame(self) -> CallFrame {
        CallFrame::new(self.file, self.line)
    }
}

/// Parse `"<file>:<line>[:<col>][:in <method>]"`.
///
/// The entry is split at every colon that is followed by a digit or by the
/// literal `in ` token. The first piece is the file and the second the line;
/// a colon followed by anything else (a drive letter separator, a `::` path)
/// stays part of the file.
pub(crate) fn parse_raw_entry(raw: &str) -> RawFrame<'_> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in raw.match_indices(':') {
        let rest = &raw[idx + 1..];
        if rest.starts_with(|c: char| c.is_ascii_digit()) || rest.starts_with("in ") {
            pieces.push(&raw[start..idx]);
            start = idx + 1;
        }
    }
    pieces.push(&raw[start..]);

    let file = pieces[0];
    let line = pieces.get(1).and_then(|p| p.trim().parse().ok());
    let method = pieces
        .iter()
        .skip(1)
        .find_map(|p| p.strip_prefix("in "))
        .map(|m| m.trim().trim_matches(|c: char| c == '`' || c == '\''));

    RawFrame { file, line, method }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_line_method() {
        let frame = parse_raw_entry("/app/my_api.rb:12:in `block in <main>'");
        assert_eq!(frame.file, "/app/my_api.rb");
        assert_eq!(frame.line, Some(12));
        assert_eq!(frame.method, Some("block in <main>"));
    }

    #[test]
    fn test_rust_location_with_column() {
        let frame = parse_raw_entry("./demos/my_sample_app.rs:30:5:in my_sample_app::main");
        assert_eq!(frame.file, "./demos/my_sample_app.rs");
        assert_eq!(frame.line, Some(30));
        assert_eq!(frame.method, Some("my_sample_app::main"));
    }

    #[test]
    fn test_drive_letter_is_part_of_file() {
        let frame = parse_raw_entry(r"C:\apps\api\main.rs:7:1");
        assert_eq!(frame.file, r"C:\apps\api\main.rs");
        assert_eq!(frame.line, Some(7));
        assert_eq!(frame.method, None);
    }

    #[test]
    fn test_bare_file() {
        let frame = parse_raw_entry("<unknown>");
        assert_eq!(frame.file, "<unknown>");
        assert_eq!(frame.line, None);
        assert_eq!(frame.into_call_frame(), CallFrame::new("<unknown>", None));
    }

    #[test]
    fn test_method_without_line() {
        let frame = parse_raw_entry("lib/boot.rs:in start");
        assert_eq!(frame.file, "lib/boot.rs");
        assert_eq!(frame.line, None);
        assert_eq!(frame.method, Some("start"));
    }
}
