//! CLI commands for jnibuild
//!
//! Each command is a plain options struct with an `execute` method so the
//! binary stays a thin argument parser.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use jnibuild_android_toolchain::{Abi, NdkLocator};
use jnibuild_build_engine::{
    clean_build_root, ensure_source_dir, BuildConfig, BuildPipeline, BuildPlanner, BuildType,
    CommandRunner, FormatReport, Formatter, Override, ProjectDefaults, SystemRunner,
};

/// Build command options
#[derive(Debug, Clone, Default)]
pub struct BuildCommand {
    pub project_dir: PathBuf,
    pub toolchain_path: Option<PathBuf>,
    pub arch: Option<Abi>,
    pub release: bool,
    pub debug: bool,
    pub min_api: Option<u32>,
    /// Print the resolved plan instead of running it
    pub dry_run: bool,
}

impl BuildCommand {
    /// Overrides in the order the flags are applied
    pub fn overrides(&self) -> Vec<Override> {
        let mut overrides = Vec::new();
        if let Some(path) = &self.toolchain_path {
            overrides.push(Override::ToolchainPath(path.clone()));
        }
        if let Some(abi) = self.arch {
            overrides.push(Override::Arch(abi));
        }
        if self.release {
            overrides.push(Override::BuildType(BuildType::Release));
        }
        if self.debug {
            overrides.push(Override::BuildType(BuildType::Debug));
        }
        if let Some(level) = self.min_api {
            overrides.push(Override::MinApi(level));
        }
        overrides
    }

    /// Execute the build command
    pub fn execute(&self) -> Result<()> {
        self.execute_with(NdkLocator::from_env(), SystemRunner)
            .map(|_| ())
    }

    /// Execute with an explicit locator and process runner
    pub fn execute_with<R: CommandRunner>(
        &self,
        locator: NdkLocator,
        runner: R,
    ) -> Result<BuildConfig> {
        let planner = BuildPlanner::new(ProjectDefaults::for_project(&self.project_dir), locator);
        let config = planner.resolve(&self.overrides())?;
        let plan = planner.plan(&config);

        if self.dry_run {
            let out = serde_json::to_string_pretty(&json!({ "config": config, "plan": plan }))
                .context("Failed to serialize build plan")?;
            println!("{}", out);
            return Ok(config);
        }

        log_banner(&config);
        BuildPipeline::new(runner).execute(&plan)?;
        Ok(config)
    }
}

fn log_banner(config: &BuildConfig) {
    info!("{}", "=".repeat(50));
    info!("Configuring Android build");
    info!("  ABI:        {}", config.architecture);
    info!("  Min API:    {}", config.min_platform_api);
    info!("  Build type: {}", config.build_type.as_str());
    info!("  NDK:        {}", config.toolchain_path.display());
    info!("  Output:     {}", config.output_dir.display());
    info!("{}", "=".repeat(50));
}

/// Clean command options
#[derive(Debug, Clone, Default)]
pub struct CleanCommand {
    pub project_dir: PathBuf,
}

impl CleanCommand {
    /// Remove the build root; succeeds when it is already gone
    pub fn execute(&self) -> Result<()> {
        let build_root = ProjectDefaults::for_project(&self.project_dir).build_root();
        if !clean_build_root(&build_root)? {
            info!("Nothing to clean");
        }
        Ok(())
    }
}

/// Format command options
#[derive(Debug, Clone, Default)]
pub struct FormatCommand {
    pub project_dir: PathBuf,
    pub verbose: bool,
}

impl FormatCommand {
    /// Format the JNI sources. Per-file failures are logged, not returned.
    pub fn execute(&self) -> Result<FormatReport> {
        let source_dir = ProjectDefaults::for_project(&self.project_dir).jni_source_path();
        ensure_source_dir(&source_dir)?;
        let formatter = Formatter::detect()?.verbose(self.verbose);
        let report = formatter.format_tree(&source_dir, &mut SystemRunner)?;
        Ok(report)
    }
}
