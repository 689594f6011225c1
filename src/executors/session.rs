// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Local pipeline session
//!
//! Runs nodes in-process through a [`NodeController`] and records each
//! outcome in an execution report.

use tracing::{error, info};

use super::{NodeController, NodeOutcome};
use crate::errors::{NodeflowError, NodeflowResult};
use crate::graph::{Node, Pipeline};
use crate::report::{OverallStatus, ReportGenerator};

/// Report entry status for a node that ran
const NODE_SUCCESS: &str = "success";

/// Report entry status for the node that stopped the run
const NODE_FAILED: &str = "failed";

/// Controller and report for one local run
pub struct PipelineSession {
    controller: NodeController,
    report: ReportGenerator,
}

impl PipelineSession {
    pub fn new(report: ReportGenerator) -> Self {
        Self {
            controller: NodeController::new(),
            report,
        }
    }

    pub fn controller(&self) -> &NodeController {
        &self.controller
    }

    pub fn report(&self) -> &ReportGenerator {
        &self.report
    }

    /// Execute a single node and record it. The report is not finalized.
    ///
    /// Fails without running the node once the report is finalized.
    pub fn execute_node(&mut self, node: &Node) -> NodeflowResult<NodeOutcome> {
        self.report.ensure_open()?;

        match self.controller.execute(node) {
            Ok(outcome) => {
                self.report
                    .add_node_result(node.id(), NODE_SUCCESS, Some(outcome.to_details()))?;
                info!(node_id = %node.id(), "Node executed");
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure(node, &e);
                Err(e)
            }
        }
    }

    /// Name the report and write it with `status`
    pub fn finish(&mut self, name: &str, status: OverallStatus) -> NodeflowResult<()> {
        self.report.ensure_open()?;
        self.report.set_pipeline_name(name);
        self.report.finalize_report(status)
    }

    /// Execute every node in pipeline order, then finalize the report.
    ///
    /// Each call starts a new report at the same path. Stops at the first
    /// failing node: it is recorded as failed, the report is finalized as
    /// failed, and the node's error is returned.
    pub fn execute_pipeline(
        &mut self,
        name: &str,
        pipeline: &Pipeline,
    ) -> NodeflowResult<Vec<NodeOutcome>> {
        self.report = ReportGenerator::new(self.report.report_file());
        self.report.set_pipeline_name(name);

        let mut outcomes = Vec::with_capacity(pipeline.len());
        for node in pipeline {
            match self.controller.execute(node) {
                Ok(outcome) => {
                    self.report
                        .add_node_result(node.id(), NODE_SUCCESS, Some(outcome.to_details()))?;
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!(pipeline = name, node_id = %node.id(), error = %e, "Pipeline execution error");
                    self.record_failure(node, &e);
                    if let Err(write_err) = self.report.finalize_report(OverallStatus::Failed) {
                        error!(error = %write_err, "Could not write failed report");
                    }
                    return Err(e);
                }
            }
        }

        self.report.finalize_report(OverallStatus::Success)?;
        info!(pipeline = name, nodes = outcomes.len(), "Pipeline execution completed");
        Ok(outcomes)
    }

    /// Record a failed node; the node's error outranks a report error
    fn record_failure(&mut self, node: &Node, error: &NodeflowError) {
        let details = Some(serde_json::Value::String(error.to_string()));
        if let Err(report_err) = self.report.add_node_result(node.id(), NODE_FAILED, details) {
            error!(node_id = %node.id(), error = %report_err, "Could not record failed node");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeAction, Position};
    use crate::report::ExecutionReport;
    use tempfile::TempDir;

    fn node(id: &str, action: &str) -> Node {
        Node::new(id, Position::default(), NodeAction::declarative(action))
    }

    #[test]
    fn test_execute_pipeline_success() {
        let temp = TempDir::new().unwrap();
        let report_path = temp.path().join("report.json");
        let pipeline = Pipeline::from_nodes(vec![
            node("load", "DataProcessor"),
            node("clean", "DataProcessor"),
            node("fit", "ModelTrainer"),
        ])
        .unwrap();

        let mut session = PipelineSession::new(ReportGenerator::new(&report_path));
        let outcomes = session.execute_pipeline("demo", &pipeline).unwrap();
        assert_eq!(outcomes.len(), 3);

        let report = ExecutionReport::from_file(&report_path).unwrap();
        assert_eq!(report.overall_status, OverallStatus::Success);
        assert_eq!(report.pipeline_name.as_deref(), Some("demo"));
        assert_eq!(report.nodes.len(), 3);
        assert_eq!(report.nodes[2].details["status"], "trained");
    }

    #[test]
    fn test_execute_pipeline_stops_on_failure() {
        let temp = TempDir::new().unwrap();
        let report_path = temp.path().join("report.json");
        let pipeline = Pipeline::from_nodes(vec![
            node("load", "DataProcessor"),
            node("bad", "Unsupported"),
            node("fit", "ModelTrainer"),
        ])
        .unwrap();

        let mut session = PipelineSession::new(ReportGenerator::new(&report_path));
        let result = session.execute_pipeline("demo", &pipeline);
        assert!(matches!(result, Err(NodeflowError::UnknownNodeType { .. })));

        let report = ExecutionReport::from_file(&report_path).unwrap();
        assert_eq!(report.overall_status, OverallStatus::Failed);
        assert_eq!(report.nodes.len(), 2);
        assert_eq!(report.nodes[1].status, "failed");
        assert!(session.controller().saved_result("fit").is_none());
    }

    #[test]
    fn test_execute_single_node() {
        let mut session = PipelineSession::new(ReportGenerator::new("unused.json"));
        session.execute_node(&node("load", "DataProcessor")).unwrap();

        let data = session.report().get_report_data();
        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.overall_status, OverallStatus::Pending);
    }

    #[test]
    fn test_single_node_failure_then_finish() {
        let temp = TempDir::new().unwrap();
        let report_path = temp.path().join("report.json");
        let mut session = PipelineSession::new(ReportGenerator::new(&report_path));

        assert!(session.execute_node(&node("odd", "Unsupported")).is_err());
        session.finish("demo", OverallStatus::Failed).unwrap();

        let report = ExecutionReport::from_file(&report_path).unwrap();
        assert_eq!(report.nodes[0].status, "failed");
        assert_eq!(report.overall_status, OverallStatus::Failed);
        assert!(report.execution_date.is_some());
    }

    #[test]
    fn test_reused_session_reports_each_run_alone() {
        let temp = TempDir::new().unwrap();
        let report_path = temp.path().join("report.json");
        let mut session = PipelineSession::new(ReportGenerator::new(&report_path));

        let first = Pipeline::from_nodes(vec![node("load", "DataProcessor")]).unwrap();
        let second = Pipeline::from_nodes(vec![node("fit", "ModelTrainer")]).unwrap();
        session.execute_pipeline("first", &first).unwrap();
        session.execute_pipeline("second", &second).unwrap();

        let report = ExecutionReport::from_file(&report_path).unwrap();
        assert_eq!(report.pipeline_name.as_deref(), Some("second"));
        assert_eq!(report.nodes.len(), 1);
        assert_eq!(report.nodes[0].node_id, "fit");
    }

    #[test]
    fn test_finished_session_rejects_more_work() {
        let temp = TempDir::new().unwrap();
        let mut session = PipelineSession::new(ReportGenerator::new(temp.path().join("r.json")));

        session.execute_node(&node("load", "DataProcessor")).unwrap();
        session.finish("demo", OverallStatus::Success).unwrap();

        assert!(matches!(
            session.execute_node(&node("fit", "ModelTrainer")),
            Err(NodeflowError::ReportFinalized { .. })
        ));
        assert!(session.controller().saved_result("fit").is_none());
        assert!(matches!(
            session.finish("demo", OverallStatus::Failed),
            Err(NodeflowError::ReportFinalized { .. })
        ));
        assert_eq!(session.report().get_report_data().overall_status, OverallStatus::Success);
    }
}
