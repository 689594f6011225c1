// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Error types
//!
//! Synchronous operations (codec, compiler, node executor, report writer)
//! surface these to their caller. The run service is the exception: errors
//! raised after `execute_pipeline` has returned are folded into the run's
//! status and log file instead.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for nodeflow operations
pub type NodeflowResult<T> = Result<T, NodeflowError>;

/// Main error type for nodeflow
#[derive(Error, Debug, Diagnostic)]
pub enum NodeflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Graph Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    #[diagnostic(
        code(nodeflow::not_found),
        help("Check the path, or pass -C <dir> to run from the project directory")
    )]
    NotFound { path: PathBuf },

    #[error("Invalid graph record #{index}: {reason}")]
    #[diagnostic(
        code(nodeflow::schema),
        help("Every record needs `id`, `position: {{x, y}}` and `__class`")
    )]
    Schema { index: usize, reason: String },

    #[error("Duplicate node id '{id}'")]
    #[diagnostic(
        code(nodeflow::duplicate_node_id),
        help("Node ids must be unique within a pipeline")
    )]
    DuplicateNodeId { id: String },

    #[error("Node '{node_id}' declares {group} port '{port}' twice")]
    #[diagnostic(code(nodeflow::duplicate_port))]
    DuplicatePort {
        node_id: String,
        group: String,
        port: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Unknown node type: {kind}")]
    #[diagnostic(
        code(nodeflow::unknown_node_type),
        help("Supported node types: DataProcessor, ModelTrainer")
    )]
    UnknownNodeType { kind: String },

    #[error("Node '{node_id}' failed: {message}")]
    #[diagnostic(code(nodeflow::node_failed))]
    NodeFailed { node_id: String, message: String },

    #[error("Workflow runner error: {message}")]
    #[diagnostic(code(nodeflow::external_process))]
    ExternalProcess {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid pipeline name '{name}': {reason}")]
    #[diagnostic(
        code(nodeflow::invalid_pipeline_name),
        help("Pipeline names become part of the log file name")
    )]
    InvalidPipelineName { name: String, reason: String },

    #[error("Report '{path}' is already finalized")]
    #[diagnostic(
        code(nodeflow::report_finalized),
        help("Start a new report for each run")
    )]
    ReportFinalized { path: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error on '{path}': {message}")]
    #[diagnostic(code(nodeflow::io_error))]
    Io { path: PathBuf, message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(nodeflow::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(nodeflow::json_error))]
    Json { message: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(nodeflow::config_error))]
    Config { message: String },
}

impl From<serde_yaml::Error> for NodeflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for NodeflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl NodeflowError {
    /// Wrap an IO failure with the path it happened on
    pub fn io(path: impl AsRef<Path>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: error.to_string(),
        }
    }

    /// Create a schema error for a graph record
    pub fn schema(index: usize, reason: impl Into<String>) -> Self {
        Self::Schema {
            index,
            reason: reason.into(),
        }
    }

    /// Create a launch error with a hint about the runner executable
    pub fn runner_launch_failed(executable: &Path, error: &std::io::Error) -> Self {
        let help = match error.kind() {
            std::io::ErrorKind::NotFound => Some(format!(
                "'{}' was not found. Set `runner.executable` in .nodeflow.yaml",
                executable.display()
            )),
            std::io::ErrorKind::PermissionDenied => Some(format!(
                "'{}' is not executable",
                executable.display()
            )),
            _ => None,
        };

        Self::ExternalProcess {
            message: format!("failed to launch '{}': {}", executable.display(), error),
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_path() {
        let err = NodeflowError::io(
            "out/report.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        let message = err.to_string();
        assert!(message.contains("out/report.json"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_missing_runner_has_help() {
        let err = NodeflowError::runner_launch_failed(
            Path::new("./act"),
            &std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );

        match err {
            NodeflowError::ExternalProcess { help, .. } => {
                assert!(help.unwrap().contains("runner.executable"));
            }
            other => panic!("Expected ExternalProcess, got {other:?}"),
        }
    }
}
