//! Source formatting
//!
//! Runs `clang-format` in place over every C/C++ source below the JNI
//! directory. Each file is formatted on its own: one failure is reported
//! and the rest still run.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::runner::{CommandRunner, InvocationSpec};
use crate::BuildError;

/// Extensions picked up for formatting
pub const SOURCE_EXTENSIONS: &[&str] = &["h", "hpp", "c", "cc", "cpp"];

/// Formatter executable looked up on `PATH`
pub const FORMATTER_TOOL: &str = "clang-format";

/// Outcome of a formatting pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatReport {
    pub formatted: usize,
    pub failed: Vec<PathBuf>,
}

impl FormatReport {
    pub fn total(&self) -> usize {
        self.formatted + self.failed.len()
    }
}

/// clang-format driver
#[derive(Debug, Clone)]
pub struct Formatter {
    program: String,
    verbose: bool,
}

impl Formatter {
    /// Find `clang-format` on `PATH`
    pub fn detect() -> Result<Self, BuildError> {
        let path = which::which(FORMATTER_TOOL).map_err(|_| BuildError::ToolUnavailable {
            tool: FORMATTER_TOOL.to_string(),
        })?;
        debug!("Using {}", path.display());
        Ok(Self::with_program(path.to_string_lossy()))
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            verbose: false,
        }
    }

    /// Log every file as it is formatted
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// In-place format of `file` using the nearest `.clang-format`
    pub fn invocation(&self, file: &Path) -> InvocationSpec {
        InvocationSpec::new(self.program.as_str())
            .args(["-i", "--style=file"])
            .arg(file.to_string_lossy())
    }

    /// Format every recognised source under `source_dir`
    pub fn format_tree<R: CommandRunner>(
        &self,
        source_dir: &Path,
        runner: &mut R,
    ) -> Result<FormatReport, BuildError> {
        ensure_source_dir(source_dir)?;

        let files = collect_sources(source_dir);
        let mut report = FormatReport::default();
        if files.is_empty() {
            info!("No source files found in {}", source_dir.display());
            return Ok(report);
        }

        info!("Formatting {} file(s)...", files.len());
        for file in files {
            if self.verbose {
                info!("Formatting: {}", file.display());
            }
            match runner.run(&self.invocation(&file)) {
                Ok(Some(0)) => report.formatted += 1,
                Ok(status) => {
                    warn!("{} failed on {} ({:?})", FORMATTER_TOOL, file.display(), status);
                    report.failed.push(file);
                }
                Err(e) => {
                    warn!("{}: {}", file.display(), e);
                    report.failed.push(file);
                }
            }
        }

        info!(
            "Formatting done: {} formatted, {} failed",
            report.formatted,
            report.failed.len()
        );
        Ok(report)
    }
}

/// Fail with `SourceDirNotFound` unless `dir` is an existing directory
pub fn ensure_source_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(BuildError::SourceDirNotFound {
            path: dir.to_path_buf(),
        })
    }
}

/// Recursively list sources with a recognised extension, sorted by path.
pub fn collect_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_source_file(path))
        .collect()
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::tests::FakeRunner;
    use std::fs;

    fn source_tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let jni = tmp.path().join("librime_jni");
        fs::create_dir_all(jni.join("nested")).unwrap();
        for name in ["rime_jni.cc", "levers.cc", "jni-utils.h", "CMakeLists.txt", "README.md"] {
            fs::write(jni.join(name), "").unwrap();
        }
        for name in ["objconv.hpp", "proto.cpp", "legacy.c", "notes.txt"] {
            fs::write(jni.join("nested").join(name), "").unwrap();
        }
        tmp
    }

    #[test]
    fn test_collect_sources_filters_extensions() {
        let tmp = source_tree();
        let jni = tmp.path().join("librime_jni");

        let names: Vec<_> = collect_sources(&jni)
            .iter()
            .map(|p| p.strip_prefix(&jni).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            names,
            vec![
                "jni-utils.h",
                "levers.cc",
                "nested/legacy.c",
                "nested/objconv.hpp",
                "nested/proto.cpp",
                "rime_jni.cc",
            ]
        );
    }

    #[test]
    fn test_format_every_file_in_place() {
        let tmp = source_tree();
        let jni = tmp.path().join("librime_jni");
        let mut runner = FakeRunner::default();

        let report = Formatter::with_program("clang-format")
            .format_tree(&jni, &mut runner)
            .unwrap();

        assert_eq!(report.formatted, 6);
        assert!(report.failed.is_empty());
        assert_eq!(runner.calls.len(), 6);
        for call in &runner.calls {
            assert_eq!(call.program, "clang-format");
            assert_eq!(&call.args[..2], &["-i", "--style=file"]);
        }
    }

    #[test]
    fn test_one_failure_does_not_stop_the_rest() {
        let tmp = source_tree();
        let jni = tmp.path().join("librime_jni");
        let mut runner = FakeRunner::failing_on("levers.cc", Some(1));

        let report = Formatter::with_program("clang-format")
            .verbose(true)
            .format_tree(&jni, &mut runner)
            .unwrap();

        assert_eq!(runner.calls.len(), 6);
        assert_eq!(report.formatted, 5);
        assert_eq!(report.failed, vec![jni.join("levers.cc")]);
        assert_eq!(report.total(), 6);
    }

    #[test]
    fn test_missing_source_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("librime_jni");
        let mut runner = FakeRunner::default();

        let err = Formatter::with_program("clang-format")
            .format_tree(&missing, &mut runner)
            .unwrap_err();

        match err {
            BuildError::SourceDirNotFound { path } => assert_eq!(path, missing),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_empty_tree_is_success() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runner = FakeRunner::default();

        let report = Formatter::with_program("clang-format")
            .format_tree(tmp.path(), &mut runner)
            .unwrap();
        assert_eq!(report, FormatReport::default());
        assert!(runner.calls.is_empty());
    }
}
