//! Build Planner
//!
//! Merges caller overrides onto [`ProjectDefaults`], resolves the NDK and
//! produces the ordered CMake invocations for one ABI.

use std::path::{Component, Path, PathBuf};

use jnibuild_android_toolchain::{has_marker, marker_path, NdkLocator};
use serde::Serialize;
use tracing::{debug, info};

use crate::runner::{InvocationSpec, Phase};
use crate::{BuildConfig, BuildError, BuildType, Override, ProjectDefaults};

/// CMake executable driving every phase
const CMAKE: &str = "cmake";

/// Generator passed to `cmake -G`
const GENERATOR: &str = "Ninja";

/// Flags passed to every configure step regardless of the build settings
const FIXED_CONFIGURE_FLAGS: &[&str] = &[
    "-DCMAKE_ANDROID_NDK_TOOLCHAIN_VERSION=clang",
    "-DCMAKE_SYSTEM_NAME=Android",
    "-DCMAKE_SYSTEM_VERSION=14",
    "-DCMAKE_EXPORT_COMPILE_COMMANDS=1",
];

/// The three invocations of one build, in execution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub output_dir: PathBuf,
    /// Generate, build, install
    pub steps: [InvocationSpec; 3],
}

impl BuildPlan {
    pub fn step(&self, phase: Phase) -> &InvocationSpec {
        &self.steps[phase.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &InvocationSpec)> {
        Phase::ORDER.into_iter().zip(self.steps.iter())
    }
}

/// Build planner
#[derive(Debug, Clone)]
pub struct BuildPlanner {
    defaults: ProjectDefaults,
    locator: NdkLocator,
}

impl BuildPlanner {
    pub fn new(defaults: ProjectDefaults, locator: NdkLocator) -> Self {
        Self { defaults, locator }
    }

    /// Resolve `overrides` into a complete configuration.
    ///
    /// All validation happens here, before any external process is started.
    /// On success the per-ABI output directory exists. Relative paths are
    /// taken from the current working directory and come back absolute.
    pub fn resolve(&self, overrides: &[Override]) -> Result<BuildConfig, BuildError> {
        let cwd = std::env::current_dir().map_err(|e| BuildError::filesystem(".", e))?;
        self.resolve_in(&cwd, overrides)
    }

    /// [`resolve`](Self::resolve) with relative paths taken from `base`
    pub(crate) fn resolve_in(
        &self,
        base: &Path,
        overrides: &[Override],
    ) -> Result<BuildConfig, BuildError> {
        let requests_release = overrides
            .iter()
            .any(|o| *o == Override::BuildType(BuildType::Release));
        let requests_debug = overrides
            .iter()
            .any(|o| *o == Override::BuildType(BuildType::Debug));
        if requests_release && requests_debug {
            return Err(BuildError::ConflictingBuildType);
        }

        let mut architecture = self.defaults.architecture;
        let mut min_platform_api = self.defaults.min_platform_api;
        let mut build_type = self.defaults.build_type;
        let mut explicit_toolchain: Option<&Path> = None;

        for o in overrides {
            match o {
                Override::Arch(abi) => architecture = *abi,
                Override::ToolchainPath(path) => {
                    explicit_toolchain = (!path.as_os_str().is_empty()).then_some(path.as_path());
                }
                Override::BuildType(kind) => build_type = *kind,
                Override::MinApi(level) => min_platform_api = *level,
            }
        }

        if min_platform_api == 0 {
            return Err(BuildError::InvalidMinApi);
        }

        let toolchain_path = match explicit_toolchain {
            Some(path) => {
                let path = anchored(base, path);
                if !has_marker(&path) {
                    return Err(BuildError::InvalidToolchainPath {
                        path: marker_path(&path),
                    });
                }
                path
            }
            None => {
                let detected = self
                    .locator
                    .locate()
                    .ok_or(BuildError::ToolchainNotFound)?;
                info!("Detected NDK at {}", detected.display());
                detected
            }
        };

        let project_dir = anchored(base, &self.defaults.project_dir);
        let output_dir = project_dir
            .join(&self.defaults.build_root_dir)
            .join(architecture.abi_name());
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| BuildError::filesystem(&output_dir, e))?;
        debug!("Output directory ready: {}", output_dir.display());

        Ok(BuildConfig {
            project_dir,
            architecture,
            min_platform_api,
            build_type,
            build_root_dir: self.defaults.build_root_dir.clone(),
            toolchain_path,
            jni_source_dir: self.defaults.jni_source_dir.clone(),
            output_dir,
        })
    }

    /// Translate a resolved configuration into its configure, build and install invocations
    pub fn plan(&self, config: &BuildConfig) -> BuildPlan {
        let out = config.output_dir.display().to_string();
        let project = config.project_dir.display().to_string();

        let generate = InvocationSpec::new(CMAKE)
            .args([project.as_str(), "-B", out.as_str(), "-G", GENERATOR])
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                config.toolchain_file().display()
            ))
            .arg(format!("-DANDROID_ABI={}", config.architecture))
            .arg(format!("-DCMAKE_BUILD_TYPE={}", config.build_type.as_str()))
            .arg(format!(
                "-DANDROID_NATIVE_API_LEVEL={}",
                config.min_platform_api
            ))
            .args(FIXED_CONFIGURE_FLAGS.iter().copied())
            .current_dir(&config.project_dir);

        let build = InvocationSpec::new(CMAKE)
            .args(["--build", out.as_str()])
            .current_dir(&config.project_dir);

        let install = InvocationSpec::new(CMAKE)
            .args(["--install", out.as_str()])
            .current_dir(&config.project_dir);

        BuildPlan {
            output_dir: config.output_dir.clone(),
            steps: [generate, build, install],
        }
    }
}

/// `path` as seen from `base`, with `.` components dropped
fn anchored(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .fold(base.to_path_buf(), |acc, c| acc.join(c))
}
