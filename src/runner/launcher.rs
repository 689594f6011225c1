// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Workflow runner processes

use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::errors::{NodeflowError, NodeflowResult};

/// How a runner process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerExit {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl RunnerExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that can run a compiled workflow to completion
#[async_trait]
pub trait WorkflowLauncher: Send + Sync {
    /// Run `workflow`, writing combined stdout/stderr to `log`.
    ///
    /// Returns an error only when the runner could not be started.
    async fn run(&self, workflow: &Path, log: File) -> NodeflowResult<RunnerExit>;
}

/// Launches the external runner as `<executable> -W <workflow> <args...>`
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    executable: PathBuf,
    args: Vec<String>,
}

impl ProcessLauncher {
    pub fn new(executable: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(config.executable.clone(), config.args.clone())
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Resolve the runner executable on disk or in PATH
    pub fn resolve(&self) -> NodeflowResult<PathBuf> {
        which::which(&self.executable).map_err(|e| NodeflowError::ExternalProcess {
            message: format!("runner '{}' not found: {}", self.executable.display(), e),
            help: Some("Install the workflow runner or set `runner.executable` in .nodeflow.yaml".into()),
        })
    }
}

#[async_trait]
impl WorkflowLauncher for ProcessLauncher {
    async fn run(&self, workflow: &Path, log: File) -> NodeflowResult<RunnerExit> {
        let stderr_log = log
            .try_clone()
            .map_err(|e| NodeflowError::runner_launch_failed(&self.executable, &e))?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg("-W").arg(workflow);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::from(log));
        cmd.stderr(Stdio::from(stderr_log));

        debug!(
            executable = %self.executable.display(),
            workflow = %workflow.display(),
            "Spawning workflow runner"
        );

        let status = cmd
            .status()
            .await
            .map_err(|e| NodeflowError::runner_launch_failed(&self.executable, &e))?;

        Ok(RunnerExit {
            code: status.code(),
        })
    }
}
