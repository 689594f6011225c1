// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Node executors
//!
//! Synchronous, single-node execution for interactive and step-debug use.
//! Declarative nodes dispatch on their [`NodeKind`]; nodes with a bound
//! operation run that operation.

mod controller;
mod session;

pub use controller::NodeController;
pub use session::PipelineSession;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NodeflowError;

/// Node kinds this deployment knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    DataProcessor,
    ModelTrainer,
}

impl NodeKind {
    pub const ALL: [NodeKind; 2] = [NodeKind::DataProcessor, NodeKind::ModelTrainer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataProcessor => "DataProcessor",
            Self::ModelTrainer => "ModelTrainer",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = NodeflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| NodeflowError::UnknownNodeType { kind: s.to_string() })
    }
}

/// What a handler did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// DataProcessor finished
    Processed,
    /// ModelTrainer finished
    Trained,
    /// A bound operation returned
    Executed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processed => write!(f, "processed"),
            Self::Trained => write!(f, "trained"),
            Self::Executed => write!(f, "executed"),
        }
    }
}

/// Structured result of executing one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutcome {
    pub status: OutcomeStatus,
    pub node_id: String,

    /// Value returned by a bound operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}

impl NodeOutcome {
    pub fn new(status: OutcomeStatus, node_id: impl Into<String>) -> Self {
        Self {
            status,
            node_id: node_id.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: serde_json::Value) -> Self {
        self.output = Some(output);
        self
    }

    /// Outcome as report details
    pub fn to_details(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_kind() {
        assert_eq!("DataProcessor".parse::<NodeKind>().unwrap(), NodeKind::DataProcessor);
        assert_eq!("ModelTrainer".parse::<NodeKind>().unwrap(), NodeKind::ModelTrainer);

        match "Unsupported".parse::<NodeKind>() {
            Err(NodeflowError::UnknownNodeType { kind }) => assert_eq!(kind, "Unsupported"),
            other => panic!("Expected UnknownNodeType, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_details_shape() {
        let details = NodeOutcome::new(OutcomeStatus::Processed, "load").to_details();
        assert_eq!(details, serde_json::json!({"status": "processed", "node_id": "load"}));
    }
}
