//! NDK primitives
//!
//! Target ABIs, host family and the toolchain marker check.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

/// Target ABI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Abi {
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl Abi {
    /// Get the ABI name as passed to `-DANDROID_ABI`
    pub fn abi_name(&self) -> &'static str {
        match self {
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::Arm64V8a => "arm64-v8a",
            Abi::X86 => "x86",
            Abi::X86_64 => "x86_64",
        }
    }

    /// Get all supported ABIs
    pub fn all() -> &'static [Abi] {
        &[Abi::ArmeabiV7a, Abi::Arm64V8a, Abi::X86, Abi::X86_64]
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi_name())
    }
}

/// Returned when a string names none of the supported ABIs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ABI '{}', expected one of: {}", .0, crate::SUPPORTED_ABIS.join(", "))]
pub struct ParseAbiError(pub String);

impl FromStr for Abi {
    type Err = ParseAbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Abi::all()
            .iter()
            .copied()
            .find(|abi| abi.abi_name() == s)
            .ok_or_else(|| ParseAbiError(s.to_string()))
    }
}

/// Host operating system family, which decides where NDKs are usually installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFamily {
    Windows,
    Unix,
}

impl HostFamily {
    /// Detect the family of the running host
    pub fn current() -> Self {
        if cfg!(windows) {
            HostFamily::Windows
        } else {
            HostFamily::Unix
        }
    }
}

/// Full path of the marker file beneath `root`.
pub fn marker_path(root: &Path) -> PathBuf {
    crate::TOOLCHAIN_MARKER
        .split('/')
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Check whether `root` looks like an NDK installation
pub fn has_marker(root: &Path) -> bool {
    marker_path(root).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abi_names_round_trip_through_from_str() {
        for abi in Abi::all() {
            assert_eq!(abi.abi_name().parse::<Abi>(), Ok(*abi));
        }
        assert_eq!(Abi::all().len(), crate::SUPPORTED_ABIS.len());
    }

    #[test]
    fn test_abi_from_str_rejects_unknown() {
        let err = "mips".parse::<Abi>().unwrap_err();
        assert_eq!(err, ParseAbiError("mips".into()));
        assert_eq!(
            err.to_string(),
            "unknown ABI 'mips', expected one of: armeabi-v7a, arm64-v8a, x86, x86_64"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_marker_detection() {
        let root = tempfile::tempdir().unwrap();
        assert!(!has_marker(root.path()));

        let marker = marker_path(root.path());
        assert!(marker.ends_with("build/cmake/android.toolchain.cmake"));
        std::fs::create_dir_all(marker.parent().unwrap()).unwrap();
        std::fs::write(&marker, "").unwrap();
        assert!(has_marker(root.path()));
    }
}
