// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Node controller
//!
//! Thin dispatcher from a node to its handler. No retry, no recovery:
//! failures are logged with the node id and returned unchanged.

use dashmap::DashMap;
use tracing::{error, info, instrument};

use super::{NodeKind, NodeOutcome, OutcomeStatus};
use crate::errors::NodeflowResult;
use crate::graph::{Node, NodeAction};

/// Executes single nodes and keeps the last result per node id
#[derive(Debug, Default)]
pub struct NodeController {
    saved: DashMap<String, NodeOutcome>,
}

impl NodeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one node.
    ///
    /// A result is saved only when the handler succeeds.
    #[instrument(name = "node", skip_all, fields(node_id = %node.id()))]
    pub fn execute(&self, node: &Node) -> NodeflowResult<NodeOutcome> {
        info!(action = node.action().name(), "Executing node");

        match self.dispatch(node) {
            Ok(outcome) => {
                self.save_result(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, "Error executing node");
                Err(e)
            }
        }
    }

    /// Last saved result for a node
    pub fn saved_result(&self, node_id: &str) -> Option<NodeOutcome> {
        self.saved.get(node_id).map(|entry| entry.value().clone())
    }

    /// Number of nodes with a saved result
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    fn dispatch(&self, node: &Node) -> NodeflowResult<NodeOutcome> {
        match node.action() {
            NodeAction::Executable { .. } => {
                let output = node.execute()?;
                Ok(NodeOutcome::new(OutcomeStatus::Executed, node.id()).with_output(output))
            }
            NodeAction::Declarative(action) => match action.parse::<NodeKind>()? {
                NodeKind::DataProcessor => Ok(self.process_data(node)),
                NodeKind::ModelTrainer => Ok(self.train_model(node)),
            },
        }
    }

    fn process_data(&self, node: &Node) -> NodeOutcome {
        info!("Processing data");
        NodeOutcome::new(OutcomeStatus::Processed, node.id())
    }

    fn train_model(&self, node: &Node) -> NodeOutcome {
        info!("Training model");
        NodeOutcome::new(OutcomeStatus::Trained, node.id())
    }

    fn save_result(&self, outcome: &NodeOutcome) {
        info!(status = %outcome.status, "Saving result");
        self.saved.insert(outcome.node_id.clone(), outcome.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeflowError;
    use crate::graph::Position;

    fn declarative(id: &str, action: &str) -> Node {
        Node::new(id, Position::default(), NodeAction::declarative(action))
    }

    #[test]
    fn test_data_processor() {
        let controller = NodeController::new();
        let outcome = controller.execute(&declarative("load", "DataProcessor")).unwrap();

        assert_eq!(outcome, NodeOutcome::new(OutcomeStatus::Processed, "load"));
        assert_eq!(controller.saved_result("load"), Some(outcome));
    }

    #[test]
    fn test_model_trainer() {
        let controller = NodeController::new();
        let outcome = controller.execute(&declarative("fit", "ModelTrainer")).unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Trained);
        assert_eq!(outcome.node_id, "fit");
    }

    #[test]
    fn test_unknown_kind_saves_nothing() {
        let controller = NodeController::new();
        let result = controller.execute(&declarative("odd", "Unsupported"));

        assert!(matches!(
            result,
            Err(NodeflowError::UnknownNodeType { ref kind }) if kind == "Unsupported"
        ));
        assert_eq!(controller.saved_count(), 0);
    }

    #[test]
    fn test_bound_operation() {
        let controller = NodeController::new();
        let node = Node::new(
            "custom",
            Position::default(),
            NodeAction::executable("Custom", || Ok(serde_json::json!(42))),
        );

        let outcome = controller.execute(&node).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Executed);
        assert_eq!(outcome.output, Some(serde_json::json!(42)));
    }

    #[test]
    fn test_bound_operation_failure_is_not_saved() {
        let controller = NodeController::new();
        let node = Node::new(
            "flaky",
            Position::default(),
            NodeAction::executable("Custom", || Err("disk full".to_string())),
        );

        let err = controller.execute(&node).unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(controller.saved_result("flaky").is_none());
    }
}
