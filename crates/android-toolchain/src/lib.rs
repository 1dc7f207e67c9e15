//! Android NDK Toolchain Resolution
//!
//! Finds a usable NDK installation on the host without prompting:
//! - Environment hints (`ANDROID_NDK_HOME` and friends)
//! - Conventional SDK install locations per host family
//! - Target ABI identifiers understood by the NDK CMake toolchain

pub mod detector;
pub mod env;
pub mod ndk;

pub use detector::{
    conventional_roots, rank_candidates, versioned_candidates, NdkLocator, ToolchainCandidate,
};
pub use env::{read_env_hints, EnvHint, NDK_ENV_VARS};
pub use ndk::{has_marker, marker_path, Abi, HostFamily, ParseAbiError};

/// Marker file whose presence certifies an NDK root, relative to that root.
pub const TOOLCHAIN_MARKER: &str = "build/cmake/android.toolchain.cmake";

/// Supported ABIs
pub const SUPPORTED_ABIS: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86", "x86_64"];
