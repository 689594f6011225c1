// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Node definitions
//!
//! A node is one unit of work in a pipeline graph. Its action is either a
//! symbolic identifier (what the codec reads and the compiler emits) or an
//! operation bound at construction time for interactive execution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::{NodeflowError, NodeflowResult};

/// Editor coordinates of a node. Carried through round-trips, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Operation bound to an executable node
pub type NodeOperation =
    Arc<dyn Fn() -> Result<serde_json::Value, String> + Send + Sync + 'static>;

/// What a node does
#[derive(Clone)]
pub enum NodeAction {
    /// Symbolic action identifier, e.g. `DataProcessor`
    Declarative(String),

    /// Concrete operation, invoked by [`Node::execute`]
    Executable {
        /// Name used when the node is compiled or serialized
        name: String,
        operation: NodeOperation,
    },
}

impl NodeAction {
    /// Create a declarative action
    pub fn declarative(name: impl Into<String>) -> Self {
        Self::Declarative(name.into())
    }

    /// Bind an operation under a symbolic name
    pub fn executable<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn() -> Result<serde_json::Value, String> + Send + Sync + 'static,
    {
        Self::Executable {
            name: name.into(),
            operation: Arc::new(operation),
        }
    }

    /// Symbolic name of the action
    pub fn name(&self) -> &str {
        match self {
            Self::Declarative(name) => name,
            Self::Executable { name, .. } => name,
        }
    }

    /// Whether an operation is bound
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Executable { .. })
    }
}

impl fmt::Debug for NodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declarative(name) => f.debug_tuple("Declarative").field(name).finish(),
            Self::Executable { name, .. } => f
                .debug_struct("Executable")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// A single pipeline node
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    label: String,
    position: Position,
    action: NodeAction,
    input_ports: Vec<String>,
    output_ports: Vec<String>,
}

impl Node {
    /// Create a node with no ports, labelled with its id
    pub fn new(id: impl Into<String>, position: Position, action: NodeAction) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            position,
            action,
            input_ports: Vec::new(),
            output_ports: Vec::new(),
        }
    }

    /// Set the label, builder style
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the input ports, builder style
    pub fn with_input_ports<I, S>(mut self, ports: I) -> NodeflowResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_input_ports(ports)?;
        Ok(self)
    }

    /// Set the output ports, builder style
    pub fn with_output_ports<I, S>(mut self, ports: I) -> NodeflowResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_output_ports(ports)?;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn action(&self) -> &NodeAction {
        &self.action
    }

    pub fn input_ports(&self) -> &[String] {
        &self.input_ports
    }

    pub fn output_ports(&self) -> &[String] {
        &self.output_ports
    }

    /// Replace the input ports. Names must be unique within the group.
    pub fn set_input_ports<I, S>(&mut self, ports: I) -> NodeflowResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_ports = self.checked_ports("input", ports)?;
        Ok(())
    }

    /// Replace the output ports. Names must be unique within the group.
    pub fn set_output_ports<I, S>(&mut self, ports: I) -> NodeflowResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_ports = self.checked_ports("output", ports)?;
        Ok(())
    }

    /// Invoke the bound operation.
    ///
    /// Failures from the operation are returned as-is, without retry.
    /// Declarative nodes have nothing to invoke and always fail; run them
    /// through [`crate::executors::NodeController`] instead.
    pub fn execute(&self) -> NodeflowResult<serde_json::Value> {
        match &self.action {
            NodeAction::Executable { operation, .. } => {
                operation().map_err(|message| NodeflowError::NodeFailed {
                    node_id: self.id.clone(),
                    message,
                })
            }
            NodeAction::Declarative(name) => Err(NodeflowError::NodeFailed {
                node_id: self.id.clone(),
                message: format!("action '{name}' has no bound operation"),
            }),
        }
    }

    fn checked_ports<I, S>(&self, group: &str, ports: I) -> NodeflowResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ports: Vec<String> = ports.into_iter().map(Into::into).collect();
        if let Some(dup) = first_duplicate(&ports) {
            return Err(NodeflowError::DuplicatePort {
                node_id: self.id.clone(),
                group: group.to_string(),
                port: dup.to_string(),
            });
        }
        Ok(ports)
    }
}

/// First name that appears more than once, if any
pub(crate) fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[id={}, position=({}, {}), action={}, input_ports={:?}, output_ports={:?}]",
            self.id,
            self.position.x,
            self.position.y,
            self.action.name(),
            self.input_ports,
            self.output_ports
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_defaults_to_id() {
        let node = Node::new("load", Position::new(1.0, 2.0), NodeAction::declarative("DataProcessor"));
        assert_eq!(node.label(), "load");
        assert!(node.input_ports().is_empty());
        assert!(node.output_ports().is_empty());
    }

    #[test]
    fn test_execute_bound_operation() {
        let node = Node::new(
            "hello",
            Position::default(),
            NodeAction::executable("Echo", || Ok(serde_json::json!({"greeting": "hi"}))),
        );

        let value = node.execute().unwrap();
        assert_eq!(value["greeting"], "hi");
    }

    #[test]
    fn test_execute_propagates_failure() {
        let node = Node::new(
            "broken",
            Position::default(),
            NodeAction::executable("Echo", || Err("boom".to_string())),
        );

        match node.execute() {
            Err(NodeflowError::NodeFailed { node_id, message }) => {
                assert_eq!(node_id, "broken");
                assert_eq!(message, "boom");
            }
            other => panic!("Expected NodeFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_declarative_node_cannot_execute() {
        let node = Node::new("train", Position::default(), NodeAction::declarative("ModelTrainer"));
        assert!(node.execute().is_err());
    }

    #[test]
    fn test_duplicate_port_rejected() {
        let mut node = Node::new("a", Position::default(), NodeAction::declarative("DataProcessor"));
        assert!(matches!(
            node.set_input_ports(["csv", "csv"]),
            Err(NodeflowError::DuplicatePort { .. })
        ));
        assert!(node.set_input_ports(["csv", "json"]).is_ok());
        // Same name in the other group is fine
        assert!(node.set_output_ports(["csv"]).is_ok());
    }
}
