//! Build Runner
//!
//! Runs a [`BuildPlan`] as a three-phase state machine:
//!
//! ```text
//! Idle -> Configuring -> Building -> Installing -> Done
//!              \             \            \
//!               `-------------`------------`--> Failed { phase, status }
//! ```
//!
//! A phase only starts after the previous one exited with status 0. The
//! first failure is terminal; nothing is retried.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::{BuildError, BuildPlan};

/// One step of the build pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Generate,
    Build,
    Install,
}

impl Phase {
    /// Phases in execution order
    pub const ORDER: [Phase; 3] = [Phase::Generate, Phase::Build, Phase::Install];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Generate => "generate",
            Phase::Build => "build",
            Phase::Install => "install",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Phase::Generate => 0,
            Phase::Build => 1,
            Phase::Install => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external program invocation. It succeeds only when the process exits with status 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationSpec {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl InvocationSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Render as a shell-like command line for logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes invocation specs
pub trait CommandRunner {
    /// Run `spec` to completion and return its exit code, `None` if killed by a signal.
    fn run(&mut self, spec: &InvocationSpec) -> Result<Option<i32>, BuildError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, spec: &InvocationSpec) -> Result<Option<i32>, BuildError> {
        (**self).run(spec)
    }
}

/// Runs invocations as child processes that inherit stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &InvocationSpec) -> Result<Option<i32>, BuildError> {
        debug!("Running: {}", spec.command_line());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| BuildError::LaunchFailed {
            program: spec.program.clone(),
            source,
        })?;

        Ok(status.code())
    }
}

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Configuring,
    Building,
    Installing,
    Done,
    Failed { phase: Phase, status: Option<i32> },
}

impl PipelineState {
    /// State after `phase` exited with `status`
    fn after(phase: Phase, status: Option<i32>) -> Self {
        if status != Some(0) {
            return PipelineState::Failed { phase, status };
        }
        match phase {
            Phase::Generate => PipelineState::Building,
            Phase::Build => PipelineState::Installing,
            Phase::Install => PipelineState::Done,
        }
    }
}

/// Drives a [`BuildPlan`] through its phases
pub struct BuildPipeline<R: CommandRunner> {
    runner: R,
    state: PipelineState,
}

impl<R: CommandRunner> BuildPipeline<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Run all phases of `plan` in order, stopping at the first failure
    pub fn execute(&mut self, plan: &BuildPlan) -> Result<(), BuildError> {
        self.state = PipelineState::Idle;

        loop {
            self.state = match self.state {
                PipelineState::Idle => PipelineState::Configuring,
                PipelineState::Done => {
                    info!("Build finished: {}", plan.output_dir.display());
                    return Ok(());
                }
                PipelineState::Failed { phase, status } => {
                    error!("{} step failed", phase);
                    return Err(BuildError::ExternalInvocationFailed { phase, status });
                }
                PipelineState::Configuring => self.run_phase(plan, Phase::Generate)?,
                PipelineState::Building => self.run_phase(plan, Phase::Build)?,
                PipelineState::Installing => self.run_phase(plan, Phase::Install)?,
            };
        }
    }

    fn run_phase(&mut self, plan: &BuildPlan, phase: Phase) -> Result<PipelineState, BuildError> {
        info!("Starting {} step", phase);
        match self.runner.run(plan.step(phase)) {
            Ok(status) => Ok(PipelineState::after(phase, status)),
            Err(e) => {
                error!("{} step could not be started", phase);
                self.state = PipelineState::Failed {
                    phase,
                    status: None,
                };
                Err(e)
            }
        }
    }
}
