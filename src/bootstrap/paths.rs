//! Application and root directory resolution.
//!
//! # Responsibilities
//! - `app_path`: directory of the invoking file, made absolute
//! - `root_path`: working directory at first use (app dir under test)
//! - Join caller segments onto the cached base
//!
//! # Design Decisions
//! - Each base is computed once and never recomputed, so later `chdir`
//!   calls do not move them
//! - The base is expanded (`.` and `..` folded); caller segments are joined
//!   literally, `..` included
//! - A leading `/` on a segment does not replace the base

use std::path::{Component, Path, PathBuf};

use crate::bootstrap::Bootstrap;

impl Bootstrap {
    /// Path under the application's own directory.
    ///
    /// The first call fixes the invoking file, and that file is what finalize
    /// later compares with the entry point. Calling this from a helper module
    /// before finalizing makes the helper the invoking file and the launch is
    /// skipped; call it from the program's `main` file, or after finalize.
    pub fn app_path<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let base = self.app_path.get_or_init(|| {
            let file = self.invoking_file();
            let dir = file.parent().unwrap_or_else(|| Path::new(""));
            let base = self.absolute(dir);
            tracing::debug!(app_path = %base.display(), "Cached application path");
            base
        });
        join_segments(base, segments)
    }

    /// Path under the root directory.
    ///
    /// Under the test environment this is `app_path`.
    pub fn root_path<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        if self.is_test_environment() {
            return self.app_path(segments);
        }

        let base = self.root_path.get_or_init(|| {
            let base = self.absolute(Path::new("."));
            tracing::debug!(root_path = %base.display(), "Cached root path");
            base
        });
        join_segments(base, segments)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return expand_path(path, Path::new(""));
        }
        match self.process().current_dir() {
            Ok(cwd) => expand_path(path, &cwd),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Working directory unavailable; keeping relative path"
                );
                expand_path(path, Path::new(""))
            }
        }
    }
}

/// Resolve `path` against `base`, folding `.` and `..` components.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = if path.has_root() {
        path.components().collect()
    } else {
        base.components().chain(path.components()).collect()
    };

    let mut out = PathBuf::new();
    for component in components {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let parent_is_dir = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if parent_is_dir {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn join_segments<I, S>(base: &Path, segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut path = base.to_path_buf();
    for segment in segments {
        let segment = segment.as_ref();
        let segment = segment.strip_prefix("/").unwrap_or(segment);
        path.push(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{Environment, StaticProcess};
    use crate::stack::StaticFrameSource;
    use std::sync::Arc;

    const NONE: [&str; 0] = [];

    fn bootstrap(invoking: &str, process: Arc<StaticProcess>, env: Environment) -> Bootstrap {
        Bootstrap::builder()
            .frame_source(StaticFrameSource::new([invoking]))
            .process(process)
            .environment(env)
            .build()
    }

    #[test]
    fn test_app_path_from_relative_invoking_file() {
        let process = Arc::new(StaticProcess::new("/usr/bin/api", "/srv/api"));
        let boot = bootstrap("./bin/api.rs:3:1", process, Environment::Development);

        assert_eq!(boot.app_path(NONE), PathBuf::from("/srv/api/bin"));
        assert_eq!(boot.app_path(["config", "app.toml"]), PathBuf::from("/srv/api/bin/config/app.toml"));
    }

    #[test]
    fn test_segments_are_joined_literally() {
        let process = Arc::new(StaticProcess::new("/usr/bin/api", "/"));
        let boot = bootstrap("/srv/api/main.rs:1:1", process, Environment::Development);

        assert_eq!(boot.app_path(["..", "shared"]), PathBuf::from("/srv/api/../shared"));
        assert_eq!(boot.app_path(["/public"]), PathBuf::from("/srv/api/public"));
    }

    #[test]
    fn test_paths_survive_working_directory_change() {
        let process = Arc::new(StaticProcess::new("/usr/bin/api", "/srv/api"));
        let boot = bootstrap("./main.rs:1:1", process.clone(), Environment::Development);

        let app_before = boot.app_path(["views"]);
        let root_before = boot.root_path(["log"]);

        process.set_current_dir("/tmp/elsewhere");

        assert_eq!(boot.app_path(["views"]), app_before);
        assert_eq!(boot.root_path(["log"]), root_before);
        assert_eq!(root_before, PathBuf::from("/srv/api/log"));
        assert_eq!(app_before, PathBuf::from("/srv/api/views"));
    }

    #[test]
    fn test_root_path_is_working_directory() {
        let process = Arc::new(StaticProcess::new("/usr/bin/api", "/var/run/api"));
        let boot = bootstrap("/srv/api/main.rs:1:1", process, Environment::Production);

        assert_eq!(boot.root_path(NONE), PathBuf::from("/var/run/api"));
        assert_eq!(boot.root_path(["tmp"]), PathBuf::from("/var/run/api/tmp"));
    }

    #[test]
    fn test_root_path_under_test_is_app_path() {
        let process = Arc::new(StaticProcess::new("/usr/bin/api", "/var/run/api"));
        let boot = bootstrap("/srv/api/main.rs:1:1", process, Environment::Test);

        assert_eq!(boot.root_path(["fixtures"]), PathBuf::from("/srv/api/fixtures"));
        assert_eq!(boot.root_path(["fixtures"]), boot.app_path(["fixtures"]));
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path(Path::new("./a/../b"), Path::new("/srv")), PathBuf::from("/srv/b"));
        assert_eq!(expand_path(Path::new("/etc/./x"), Path::new("/srv")), PathBuf::from("/etc/x"));
        assert_eq!(expand_path(Path::new("../.."), Path::new("/srv")), PathBuf::from("/"));
        assert_eq!(expand_path(Path::new("."), Path::new("")), PathBuf::from("."));
        assert_eq!(expand_path(Path::new("../x"), Path::new("")), PathBuf::from("../x"));
    }
}
