//! Toolchain Detection
//!
//! Locates an existing Android NDK installation.
//!
//! Environment hints are tried first, in priority order. When none of them
//! points at a valid root, the conventional SDK locations for the host are
//! scanned and their versioned subdirectories ranked by modification time,
//! newest first. That ranking is a heuristic for "most recently installed",
//! not a version comparison.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::env::{read_env_hints, EnvHint};
use crate::ndk::{has_marker, HostFamily};

/// A versioned NDK directory found under a conventional root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainCandidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl ToolchainCandidate {
    pub fn new(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }

    /// Read the modification time of `path`, if it can be read.
    fn probe(path: PathBuf) -> Option<Self> {
        let metadata = fs::metadata(&path).ok()?;
        if !metadata.is_dir() {
            return None;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        Some(Self { path, modified })
    }
}

/// Order candidates most-recently-modified first.
///
/// Ties fall back to the directory name, descending, so the result does not
/// depend on directory listing order.
pub fn rank_candidates(candidates: &mut [ToolchainCandidate]) {
    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.path.file_name().cmp(&a.path.file_name()))
    });
}

/// Get the conventional NDK parent directories for a host family
pub fn conventional_roots(family: HostFamily) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let home = dirs::home_dir();

    match family {
        HostFamily::Windows => {
            if let Some(local) = dirs::data_local_dir() {
                roots.push(local.join("Android").join("Sdk").join("ndk"));
            }
            if let Some(program_files) = std::env::var_os("ProgramFiles") {
                roots.push(
                    PathBuf::from(program_files)
                        .join("Android")
                        .join("android-sdk")
                        .join("ndk"),
                );
            }
            if let Some(home) = &home {
                roots.push(
                    home.join("AppData")
                        .join("Local")
                        .join("Android")
                        .join("Sdk")
                        .join("ndk"),
                );
            }
        }
        HostFamily::Unix => {
            if let Some(home) = &home {
                roots.push(home.join("Android").join("Sdk").join("ndk"));
                roots.push(home.join("Library").join("Android").join("sdk").join("ndk"));
            }
            roots.push(PathBuf::from("/opt/android-sdk/ndk"));
        }
    }

    roots
}

/// NDK locator
#[derive(Debug, Clone, Default)]
pub struct NdkLocator {
    hints: Vec<EnvHint>,
    search_roots: Vec<PathBuf>,
}

impl NdkLocator {
    /// Create a locator from explicit hints and search roots
    pub fn new(hints: Vec<EnvHint>, search_roots: Vec<PathBuf>) -> Self {
        Self {
            hints,
            search_roots,
        }
    }

    /// Create a locator from the process environment and the host's conventional roots
    pub fn from_env() -> Self {
        Self::new(read_env_hints(), conventional_roots(HostFamily::current()))
    }

    /// Find an NDK root, or `None` when nothing on this host qualifies.
    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(path) = self.locate_from_hints() {
            return Some(path);
        }

        self.search_roots
            .iter()
            .find_map(|root| Self::locate_in_root(root))
    }

    fn locate_from_hints(&self) -> Option<PathBuf> {
        for hint in &self.hints {
            if has_marker(&hint.path) {
                info!("Using NDK from {}: {:?}", hint.var, hint.path);
                return Some(hint.path.clone());
            }
            debug!(
                "{} points at {:?}, which has no toolchain file",
                hint.var, hint.path
            );
        }
        None
    }

    fn locate_in_root(root: &Path) -> Option<PathBuf> {
        if !root.is_dir() {
            return None;
        }

        let candidates = versioned_candidates(root);
        debug!("Found {} candidate(s) under {:?}", candidates.len(), root);

        candidates
            .into_iter()
            .map(|candidate| candidate.path)
            .find(|path| has_marker(path))
    }
}

/// List the immediate subdirectories of `root`, ranked newest first.
pub fn versioned_candidates(root: &Path) -> Vec<ToolchainCandidate> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read {:?}: {}", root, e);
            return Vec::new();
        }
    };

    let mut candidates: Vec<ToolchainCandidate> = entries
        .flatten()
        .filter_map(|entry| ToolchainCandidate::probe(entry.path()))
        .collect();

    rank_candidates(&mut candidates);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndk::marker_path;
    use std::time::Duration;

    fn install_ndk(root: &Path) {
        let marker = marker_path(root);
        fs::create_dir_all(marker.parent().unwrap()).unwrap();
        fs::write(marker, "# toolchain").unwrap();
    }

    fn set_mtime(dir: &Path, secs: u64) {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        fs::File::open(dir).unwrap().set_modified(time).unwrap();
    }

    #[test]
    fn test_env_hint_wins_over_conventional_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let from_env = tmp.path().join("env-ndk");
        install_ndk(&from_env);

        let sdk_ndk = tmp.path().join("sdk").join("ndk");
        install_ndk(&sdk_ndk.join("27.0.1"));

        let locator = NdkLocator::new(
            vec![EnvHint::new("ANDROID_NDK_HOME", &from_env)],
            vec![sdk_ndk],
        );
        assert_eq!(locator.locate(), Some(from_env));
    }

    #[test]
    fn test_first_valid_env_hint_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let bogus = tmp.path().join("bogus");
        fs::create_dir_all(&bogus).unwrap();
        let second = tmp.path().join("second");
        let third = tmp.path().join("third");
        install_ndk(&second);
        install_ndk(&third);

        let locator = NdkLocator::new(
            vec![
                EnvHint::new("ANDROID_NDK_HOME", &bogus),
                EnvHint::new("ANDROID_NDK_ROOT", &second),
                EnvHint::new("NDK_ROOT", &third),
            ],
            Vec::new(),
        );
        assert_eq!(locator.locate(), Some(second));
    }

    #[test]
    fn test_newest_valid_version_is_selected() {
        let tmp = tempfile::tempdir().unwrap();
        let ndk_dir = tmp.path().join("ndk");

        let old = ndk_dir.join("25.2.9519653");
        let newer = ndk_dir.join("26.1.10909125");
        let newest_broken = ndk_dir.join("27.0.12077973");
        install_ndk(&old);
        install_ndk(&newer);
        fs::create_dir_all(&newest_broken).unwrap();

        set_mtime(&old, 1_000);
        set_mtime(&newer, 2_000);
        set_mtime(&newest_broken, 3_000);

        let locator = NdkLocator::new(Vec::new(), vec![ndk_dir]);
        assert_eq!(locator.locate(), Some(newer));
    }

    #[test]
    fn test_mtime_beats_version_name() {
        let tmp = tempfile::tempdir().unwrap();
        let ndk_dir = tmp.path().join("ndk");

        let high_name = ndk_dir.join("28.0.0");
        let low_name = ndk_dir.join("21.4.7075529");
        install_ndk(&high_name);
        install_ndk(&low_name);
        set_mtime(&high_name, 1_000);
        set_mtime(&low_name, 5_000);

        let locator = NdkLocator::new(Vec::new(), vec![ndk_dir]);
        assert_eq!(locator.locate(), Some(low_name));
    }

    #[test]
    fn test_missing_roots_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let present = tmp.path().join("present");
        install_ndk(&present.join("26.0.0"));

        let locator = NdkLocator::new(
            Vec::new(),
            vec![tmp.path().join("absent"), present.clone()],
        );
        assert_eq!(locator.locate(), Some(present.join("26.0.0")));
    }

    #[test]
    fn test_nothing_found() {
        let tmp = tempfile::tempdir().unwrap();
        let locator = NdkLocator::new(
            vec![EnvHint::new("NDK_HOME", tmp.path().join("nope"))],
            vec![tmp.path().join("also-nope")],
        );
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn test_rank_candidates_newest_first() {
        let at = |secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        let mut candidates = vec![
            ToolchainCandidate::new("/ndk/a", at(10)),
            ToolchainCandidate::new("/ndk/c", at(30)),
            ToolchainCandidate::new("/ndk/b", at(30)),
            ToolchainCandidate::new("/ndk/d", at(20)),
        ];
        rank_candidates(&mut candidates);

        let order: Vec<_> = candidates.iter().map(|c| c.path.clone()).collect();
        assert_eq!(
            order,
            vec![
                PathBuf::from("/ndk/c"),
                PathBuf::from("/ndk/b"),
                PathBuf::from("/ndk/d"),
                PathBuf::from("/ndk/a"),
            ]
        );
    }

    #[test]
    fn test_conventional_roots_per_family() {
        let unix = conventional_roots(HostFamily::Unix);
        assert!(unix.contains(&PathBuf::from("/opt/android-sdk/ndk")));
        assert!(unix.iter().all(|p| p.ends_with("ndk")));

        let windows = conventional_roots(HostFamily::Windows);
        assert!(!windows.contains(&PathBuf::from("/opt/android-sdk/ndk")));
        assert!(windows.iter().all(|p| p.ends_with("ndk")));
    }
}
