//! Environment hints
//!
//! Reads the NDK root variables that users and CI images commonly export.

use std::path::PathBuf;

use tracing::debug;

/// Recognised NDK root variables, highest priority first.
pub const NDK_ENV_VARS: &[&str] = &[
    "ANDROID_NDK_HOME",
    "ANDROID_NDK_ROOT",
    "ANDROID_NDK",
    "NDK_HOME",
    "NDK_ROOT",
];

/// A candidate NDK root taken from an environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvHint {
    /// Variable the value came from
    pub var: String,
    /// Candidate root
    pub path: PathBuf,
}

impl EnvHint {
    pub fn new(var: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            var: var.into(),
            path: path.into(),
        }
    }
}

/// Collect hints from the process environment in priority order.
///
/// Unset and empty variables are skipped.
pub fn read_env_hints() -> Vec<EnvHint> {
    hints_from(|name| std::env::var_os(name).map(PathBuf::from))
}

pub(crate) fn hints_from<F>(lookup: F) -> Vec<EnvHint>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    NDK_ENV_VARS
        .iter()
        .filter_map(|var| {
            let path = lookup(var)?;
            if path.as_os_str().is_empty() {
                debug!("{} is set but empty, ignoring", var);
                return None;
            }
            Some(EnvHint::new(*var, path))
        })
        .collect()
}
