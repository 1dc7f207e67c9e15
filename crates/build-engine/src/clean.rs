//! Build directory cleanup

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::BuildError;

/// Remove `build_root` and everything beneath it.
///
/// Returns `Ok(false)` when there was nothing to remove.
pub fn clean_build_root(build_root: &Path) -> Result<bool, BuildError> {
    if !build_root.exists() {
        debug!("{} does not exist, nothing to clean", build_root.display());
        return Ok(false);
    }

    match std::fs::remove_dir_all(build_root) {
        Ok(()) => {
            info!("Removed {}", build_root.display());
            Ok(true)
        }
        // Removed by someone else between the check and the removal.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BuildError::filesystem(build_root, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_clean_removes_nested_build_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("build-android");
        fs::create_dir_all(root.join("arm64-v8a").join("CMakeFiles")).unwrap();
        fs::write(root.join("arm64-v8a").join("build.ninja"), "rule cc").unwrap();

        assert!(clean_build_root(&root).unwrap());
        assert!(!root.exists());
        assert!(tmp.path().exists());
    }

    #[test]
    fn test_clean_twice_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("build-android");
        fs::create_dir_all(root.join("x86_64")).unwrap();

        assert!(clean_build_root(&root).unwrap());
        assert!(!clean_build_root(&root).unwrap());
        assert!(!root.exists());
    }

    #[test]
    fn test_clean_missing_dir_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!clean_build_root(&tmp.path().join("never-built")).unwrap());
    }
}
