//! Class names derived from file names.

use std::path::Path;

/// Camel-case a snake-cased name: `my_api` → `MyApi`.
///
/// A name without underscores that already starts with an uppercase letter
/// is returned unchanged. Otherwise every `_`-delimited segment is
/// capitalized (first letter upper, rest lower) and the segments are joined.
pub fn camel_case(name: &str) -> String {
    let starts_upper = name.chars().next().is_some_and(char::is_uppercase);
    if !name.contains('_') && starts_upper {
        return name.to_string();
    }

    name.split('_').map(capitalize).collect()
}

/// The class name for an invoking file: its camel-cased file stem.
pub fn class_name_for_file(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    camel_case(&stem)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
