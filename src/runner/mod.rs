// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Pipeline run service
//!
//! Launches compiled workflows through an external runner in the background
//! and tracks each run by id. A run starts `PENDING` and is moved to `DONE`
//! or `FAILED` exactly once, by the task that owns it.
//!
//! The service is an explicit object; construct one per process and share it
//! behind an `Arc`.

mod launcher;
mod log_file;

pub use launcher::{ProcessLauncher, RunnerExit, WorkflowLauncher};
pub use log_file::{find_log, list_logs, LogFileName};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::NodeflowConfig;
use crate::errors::{NodeflowError, NodeflowResult};

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Done,
    Failed,
    /// Returned for unknown run ids, never stored
    NotFound,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
            Self::NotFound => "NOT_FOUND",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracked state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub pipeline_name: String,
    pub workflow: PathBuf,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Runner exit code, if it exited normally
    pub exit_code: Option<i32>,
    pub log_path: PathBuf,
}

/// One entry of [`RunService::list_runs`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pipeline_name: String,
    pub run_id: String,
    /// Launch time, unix seconds
    pub timestamp: i64,
    pub status: RunStatus,
}

type RunTable = Arc<DashMap<String, RunRecord>>;

/// Background workflow runs keyed by run id
pub struct RunService {
    runs: RunTable,
    handles: DashMap<String, JoinHandle<()>>,
    launcher: Arc<dyn WorkflowLauncher>,
    log_dir: PathBuf,
}

impl RunService {
    pub fn new(launcher: Arc<dyn WorkflowLauncher>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs: Arc::new(DashMap::new()),
            handles: DashMap::new(),
            launcher,
            log_dir: log_dir.into(),
        }
    }

    /// Service using the configured runner executable and log directory
    pub fn from_config(config: &NodeflowConfig) -> Self {
        Self::new(
            Arc::new(ProcessLauncher::from_config(&config.runner)),
            config.logs.directory.clone(),
        )
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Launch `workflow_path` in the background and return the new run id.
    ///
    /// Returns before the runner exits. The log file is created before this
    /// returns, so an error here means nothing was launched. Must be called
    /// from within a Tokio runtime.
    pub fn execute_pipeline(
        &self,
        pipeline_name: &str,
        workflow_path: impl Into<PathBuf>,
    ) -> NodeflowResult<String> {
        validate_pipeline_name(pipeline_name)?;

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            NodeflowError::ExternalProcess {
                message: format!("no async runtime to launch the run on: {}", e),
                help: None,
            }
        })?;

        let workflow = workflow_path.into();
        let run_id = Uuid::new_v4().simple().to_string();
        let started_at = Utc::now();
        let log_name = LogFileName::new(pipeline_name, &run_id, started_at.timestamp());

        std::fs::create_dir_all(&self.log_dir).map_err(|e| NodeflowError::io(&self.log_dir, e))?;
        let log_path = log_name.path_in(&self.log_dir);
        let log = File::create(&log_path).map_err(|e| NodeflowError::io(&log_path, e))?;

        self.runs.insert(
            run_id.clone(),
            RunRecord {
                run_id: run_id.clone(),
                pipeline_name: pipeline_name.to_string(),
                workflow: workflow.clone(),
                status: RunStatus::Pending,
                started_at,
                finished_at: None,
                exit_code: None,
                log_path: log_path.clone(),
            },
        );

        info!(
            pipeline = pipeline_name,
            run_id = %run_id,
            workflow = %workflow.display(),
            "Pipeline run launched"
        );

        let handle = runtime.spawn(run_to_completion(
            Arc::clone(&self.runs),
            Arc::clone(&self.launcher),
            run_id.clone(),
            workflow,
            log,
            log_path,
        ));
        // Keep handles only for runs still in flight
        self.handles.retain(|_, handle| !handle.is_finished());
        self.handles.insert(run_id.clone(), handle);

        Ok(run_id)
    }

    /// Current status; `NotFound` for unknown ids
    pub fn get_execution_status(&self, run_id: &str) -> RunStatus {
        self.runs
            .get(run_id)
            .map(|record| record.status)
            .unwrap_or(RunStatus::NotFound)
    }

    /// Full record of a run started by this service
    pub fn get_run(&self, run_id: &str) -> Option<RunRecord> {
        self.runs.get(run_id).map(|record| record.value().clone())
    }

    /// Contents of a run's log file, empty if there is none
    pub fn get_execution_logs(&self, pipeline_name: &str, run_id: &str) -> NodeflowResult<String> {
        if !self.log_dir.exists() {
            return Ok(String::new());
        }

        match find_log(&self.log_dir, pipeline_name, run_id)? {
            Some(path) => {
                let bytes = std::fs::read(&path).map_err(|e| NodeflowError::io(&path, e))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            None => Ok(String::new()),
        }
    }

    /// Every run with a log file, joined with live status.
    ///
    /// Runs from earlier processes report `NotFound`.
    pub fn list_runs(&self) -> NodeflowResult<Vec<RunSummary>> {
        Ok(list_logs(&self.log_dir)?
            .into_iter()
            .map(|(name, _)| RunSummary {
                status: self.get_execution_status(&name.run_id),
                pipeline_name: name.pipeline_name,
                run_id: name.run_id,
                timestamp: name.timestamp,
            })
            .collect())
    }

    /// Wait for a run's background task and return its final status.
    ///
    /// Runs already finished return their stored status.
    pub async fn wait(&self, run_id: &str) -> RunStatus {
        if let Some((_, handle)) = self.handles.remove(run_id) {
            if let Err(e) = handle.await {
                warn!(run_id, error = %e, "Run task did not complete");
            }
        }
        self.get_execution_status(run_id)
    }
}

fn validate_pipeline_name(name: &str) -> NodeflowResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains(['/', '\\']) {
        "must not contain path separators"
    } else if name == "." || name == ".." {
        "must not be a relative directory"
    } else {
        return Ok(());
    };

    Err(NodeflowError::InvalidPipelineName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

async fn run_to_completion(
    runs: RunTable,
    launcher: Arc<dyn WorkflowLauncher>,
    run_id: String,
    workflow: PathBuf,
    log: File,
    log_path: PathBuf,
) {
    let (status, exit_code) = match launcher.run(&workflow, log).await {
        Ok(exit) if exit.success() => (RunStatus::Done, exit.code),
        Ok(exit) => {
            warn!(run_id = %run_id, code = ?exit.code, "Workflow runner exited abnormally");
            (RunStatus::Failed, exit.code)
        }
        Err(e) => {
            error!(run_id = %run_id, error = %e, "Workflow runner failed to launch");
            append_to_log(&log_path, &e.to_string()).await;
            (RunStatus::Failed, None)
        }
    };

    if let Some(mut record) = runs.get_mut(&run_id) {
        record.status = status;
        record.exit_code = exit_code;
        record.finished_at = Some(Utc::now());
    }

    info!(run_id = %run_id, status = %status, "Pipeline run finished");
}

async fn append_to_log(log_path: &Path, message: &str) {
    let result = async {
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path)
            .await?;
        file.write_all(format!("{}\n", message).as_bytes()).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = result {
        warn!(path = %log_path.display(), error = %e, "Could not write to run log");
    }
}
