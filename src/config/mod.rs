// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Project configuration
//!
//! Loaded from `.nodeflow.yaml` in the project directory. Every field has a
//! default, so a missing file is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{NodeflowError, NodeflowResult};

/// Config file name looked up in the project directory
pub const CONFIG_FILE: &str = ".nodeflow.yaml";

/// Overrides `report.file`
pub const REPORT_FILE_ENV: &str = "REPORT_FILE";

/// Overrides `report.html_file`
pub const HTML_REPORT_FILE_ENV: &str = "HTML_REPORT_FILE";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeflowConfig {
    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// External workflow runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Runner executable
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Arguments appended after `-W <workflow>`
    #[serde(default = "default_runner_args")]
    pub args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            args: default_runner_args(),
        }
    }
}

fn default_executable() -> PathBuf {
    PathBuf::from("./act")
}

fn default_runner_args() -> Vec<String> {
    vec!["--container-architecture".into(), "linux/amd64".into()]
}

/// Run log storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./execution_logs")
}

/// Execution report output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_file")]
    pub file: PathBuf,

    #[serde(default = "default_html_report_file")]
    pub html_file: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file: default_report_file(),
            html_file: default_html_report_file(),
        }
    }
}

fn default_report_file() -> PathBuf {
    PathBuf::from("execution_report.json")
}

fn default_html_report_file() -> PathBuf {
    PathBuf::from("execution_report.html")
}

/// Envelope of compiled workflows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow display name
    #[serde(default = "default_workflow_name")]
    pub name: String,

    /// Runner label for the build job
    #[serde(default = "default_runs_on")]
    pub runs_on: String,

    /// Action used for the leading checkout step
    #[serde(default = "default_checkout")]
    pub checkout: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            name: default_workflow_name(),
            runs_on: default_runs_on(),
            checkout: default_checkout(),
        }
    }
}

fn default_workflow_name() -> String {
    "Python application".to_string()
}

fn default_runs_on() -> String {
    "ubuntu-latest".to_string()
}

fn default_checkout() -> String {
    "actions/checkout@v4".to_string()
}

impl NodeflowConfig {
    /// Load configuration from a project directory, then apply environment overrides
    pub fn load_from_project(project_root: &Path) -> NodeflowResult<Self> {
        let mut config = Self::load_file(&project_root.join(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it doesn't exist
    pub fn load_file(path: &Path) -> NodeflowResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| NodeflowError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration YAML. An empty document is the default config.
    pub fn from_yaml(yaml: &str) -> NodeflowResult<Self> {
        let config: Option<Self> = serde_yaml::from_str(yaml).map_err(|e| NodeflowError::Config {
            message: e.to_string(),
        })?;
        Ok(config.unwrap_or_default())
    }

    /// Apply `REPORT_FILE` / `HTML_REPORT_FILE` overrides from `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(file) = lookup(REPORT_FILE_ENV).filter(|v| !v.is_empty()) {
            self.report.file = PathBuf::from(file);
        }
        if let Some(file) = lookup(HTML_REPORT_FILE_ENV).filter(|v| !v.is_empty()) {
            self.report.html_file = PathBuf::from(file);
        }
    }
}

/// Generate a default .nodeflow.yaml
pub fn generate_default_config() -> String {
    r#"# nodeflow configuration

runner:
  # Workflow runner invoked as: <executable> -W <workflow> <args...>
  executable: ./act
  args:
    - --container-architecture
    - linux/amd64

logs:
  # One <pipeline>-<run id>-<timestamp>.log per run
  directory: ./execution_logs

report:
  # Overridden by REPORT_FILE / HTML_REPORT_FILE
  file: execution_report.json
  html_file: execution_report.html

workflow:
  name: Python application
  runs_on: ubuntu-latest
  checkout: actions/checkout@v4
"#
    .to_string()
}
