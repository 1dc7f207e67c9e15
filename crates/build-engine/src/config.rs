//! Build Configuration
//!
//! Project defaults, caller overrides and the resolved build configuration.

use std::path::PathBuf;

use jnibuild_android_toolchain::Abi;
use serde::Serialize;

/// Build type (release/debug), passed through as `CMAKE_BUILD_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BuildType {
    #[default]
    Release,
    Debug,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Release => "Release",
            BuildType::Debug => "Debug",
        }
    }
}

/// Defaults every build starts from.
///
/// Relative directories are resolved against `project_dir`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDefaults {
    pub project_dir: PathBuf,
    pub architecture: Abi,
    pub min_platform_api: u32,
    pub build_type: BuildType,
    pub build_root_dir: PathBuf,
    pub jni_source_dir: PathBuf,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            architecture: Abi::Arm64V8a,
            min_platform_api: 25,
            build_type: BuildType::Release,
            build_root_dir: PathBuf::from("build-android"),
            jni_source_dir: PathBuf::from("librime_jni"),
        }
    }
}

impl ProjectDefaults {
    /// Defaults rooted at another project directory
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Default::default()
        }
    }

    /// Build root as seen from the current working directory
    pub fn build_root(&self) -> PathBuf {
        self.project_dir.join(&self.build_root_dir)
    }

    /// JNI source tree as seen from the current working directory
    pub fn jni_source_path(&self) -> PathBuf {
        self.project_dir.join(&self.jni_source_dir)
    }
}

/// A single caller override. Later overrides of the same field win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    Arch(Abi),
    /// Explicit NDK root. An empty path counts as not given.
    ToolchainPath(PathBuf),
    BuildType(BuildType),
    MinApi(u32),
}

/// Fully resolved build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    pub project_dir: PathBuf,
    pub architecture: Abi,
    pub min_platform_api: u32,
    pub build_type: BuildType,
    pub build_root_dir: PathBuf,
    pub toolchain_path: PathBuf,
    pub jni_source_dir: PathBuf,
    /// `project_dir/build_root_dir/architecture`
    pub output_dir: PathBuf,
}

impl BuildConfig {
    /// CMake toolchain file inside the resolved NDK
    pub fn toolchain_file(&self) -> PathBuf {
        jnibuild_android_toolchain::marker_path(&self.toolchain_path)
    }
}
