// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Execution reports
//!
//! A report collects one entry per executed node, in completion order, and
//! is finalized exactly once: the date and overall status are stamped and
//! the report is written as pretty JSON. It can also be rendered to HTML.

mod html;

pub use html::render_html;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::errors::{NodeflowError, NodeflowResult};

/// Details stored when a node result carries none
pub const NO_DETAILS: &str = "No details provided.";

/// Format of `execution_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Overall status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverallStatus {
    #[default]
    Pending,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "failed")]
    Failed,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown report status: {}", s)),
        }
    }
}

/// Outcome of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    pub node_id: String,
    pub status: String,
    pub details: serde_json::Value,
}

/// Report data as written to disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub pipeline_name: Option<String>,
    pub execution_date: Option<String>,
    pub nodes: Vec<NodeReport>,
    pub overall_status: OverallStatus,
}

impl ExecutionReport {
    /// Read a report written by [`ReportGenerator::finalize_report`]
    pub fn from_file(path: &Path) -> NodeflowResult<Self> {
        if !path.exists() {
            return Err(NodeflowError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| NodeflowError::io(path, e))?;
        serde_json::from_str(&content).map_err(Into::into)
    }

    pub fn is_finalized(&self) -> bool {
        self.execution_date.is_some()
    }
}

/// Accumulates node results and writes the report
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    report_file: PathBuf,
    data: ExecutionReport,
}

impl ReportGenerator {
    /// Create a generator writing to `report_file`
    pub fn new(report_file: impl Into<PathBuf>) -> Self {
        Self {
            report_file: report_file.into(),
            data: ExecutionReport::default(),
        }
    }

    pub fn report_file(&self) -> &Path {
        &self.report_file
    }

    pub fn set_pipeline_name(&mut self, pipeline_name: impl Into<String>) {
        let pipeline_name = pipeline_name.into();
        info!(pipeline = %pipeline_name, "Pipeline name set");
        self.data.pipeline_name = Some(pipeline_name);
    }

    /// Append a node result.
    ///
    /// Empty details (`None`, null, `""`, `{}`, `[]`) are stored as
    /// [`NO_DETAILS`]. Fails once the report is finalized.
    pub fn add_node_result(
        &mut self,
        node_id: impl Into<String>,
        status: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> NodeflowResult<()> {
        self.ensure_open()?;

        let node_id = node_id.into();
        let status = status.into();
        let details = details
            .filter(|d| !is_empty_value(d))
            .unwrap_or_else(|| serde_json::Value::String(NO_DETAILS.to_string()));

        info!(node_id = %node_id, status = %status, "Node result added");
        self.data.nodes.push(NodeReport {
            node_id,
            status,
            details,
        });
        Ok(())
    }

    /// Stamp date and overall status, then write the report file.
    ///
    /// A report is finalized once; later calls fail and leave it untouched.
    pub fn finalize_report(&mut self, overall_status: OverallStatus) -> NodeflowResult<()> {
        self.ensure_open()?;

        self.data.execution_date = Some(chrono::Local::now().format(DATE_FORMAT).to_string());
        self.data.overall_status = overall_status;
        self.write_to_file()?;
        info!(status = %overall_status, "Report finalized");
        Ok(())
    }

    /// Render the current report to an HTML file
    pub fn generate_html_report(&self, html_file: &Path) -> NodeflowResult<PathBuf> {
        write_file(html_file, render_html(&self.data).as_bytes())?;
        info!(path = %html_file.display(), "HTML report generated");
        Ok(html_file.to_path_buf())
    }

    pub fn get_report_data(&self) -> &ExecutionReport {
        &self.data
    }

    /// Fail if the report has already been finalized
    pub fn ensure_open(&self) -> NodeflowResult<()> {
        if self.data.is_finalized() {
            return Err(NodeflowError::ReportFinalized {
                path: self.report_file.clone(),
            });
        }
        Ok(())
    }

    fn write_to_file(&self) -> NodeflowResult<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        write_file(&self.report_file, json.as_bytes())?;
        info!(path = %self.report_file.display(), "Report written");
        Ok(())
    }
}

fn is_empty_value(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn write_file(path: &Path, contents: &[u8]) -> NodeflowResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| NodeflowError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| NodeflowError::io(path, e))
}
