//! Android Build Engine
//!
//! Turns caller overrides into a resolved [`BuildConfig`], plans the
//! configure/build/install CMake invocations and runs them in order.
//! Also hosts the `clean` and `format` maintenance operations.

pub mod clean;
pub mod config;
pub mod format;
pub mod planner;
pub mod runner;

pub use clean::clean_build_root;
pub use config::{BuildConfig, BuildType, Override, ProjectDefaults};
pub use format::{ensure_source_dir, FormatReport, Formatter, FORMATTER_TOOL, SOURCE_EXTENSIONS};
pub use planner::{BuildPlan, BuildPlanner};
pub use runner::{BuildPipeline, CommandRunner, InvocationSpec, Phase, PipelineState, SystemRunner};

use std::path::PathBuf;

use jnibuild_android_toolchain::NDK_ENV_VARS;

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("--release and --debug cannot be used together")]
    ConflictingBuildType,
    #[error("Invalid NDK path: toolchain file not found at {}", .path.display())]
    InvalidToolchainPath { path: PathBuf },
    #[error(
        "No NDK path given and none could be detected. \
         Pass --toolchain-path or set one of: {}",
        NDK_ENV_VARS.join(", ")
    )]
    ToolchainNotFound,
    #[error("Minimum API level must be a positive integer")]
    InvalidMinApi,
    #[error("Source directory does not exist: {}", .path.display())]
    SourceDirNotFound { path: PathBuf },
    #[error("{tool} not found on PATH, please install it first")]
    ToolUnavailable { tool: String },
    #[error("{phase} step failed ({})", describe_status(.status))]
    ExternalInvocationFailed { phase: Phase, status: Option<i32> },
    #[error("Failed to start {program}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Filesystem error at {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}
