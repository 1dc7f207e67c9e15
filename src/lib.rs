//! jnibuild - Android NDK build orchestrator
//!
//! Builds the librime JNI library with CMake and the Android NDK:
//!
//! - **Toolchain resolution**: finds an NDK from environment hints or the
//!   usual SDK install locations
//! - **Build planning**: merges CLI overrides onto the project defaults and
//!   plans the configure, build and install steps
//! - **Maintenance**: `clean` removes the build root, `format` runs
//!   clang-format over the JNI sources
//!
//! ## Architecture
//!
//! - `jnibuild-android-toolchain`: NDK detection and ABI identifiers
//! - `jnibuild-build-engine`: configuration, planning, pipeline, clean, format

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use jnibuild_android_toolchain as toolchain;
pub use jnibuild_build_engine as build;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::commands::{BuildCommand, CleanCommand, FormatCommand};
    pub use jnibuild_android_toolchain::{Abi, NdkLocator};
    pub use jnibuild_build_engine::{BuildConfig, BuildError, BuildPlanner, BuildType, ProjectDefaults};
}
