// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Pipeline graph model
//!
//! A pipeline is an ordered list of nodes. Insertion order is the execution
//! and compile order; it is never re-derived from port wiring.

mod codec;
mod node;
mod wiring;

pub use codec::{GraphCodec, NodeRecord, PortList};
pub use node::{Node, NodeAction, NodeOperation, Position};
pub use wiring::{DanglingPort, PortDirection, PortWiring};

use crate::errors::{NodeflowError, NodeflowResult};

/// Ordered collection of nodes with unique ids
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    nodes: Vec<Node>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from nodes, keeping their order.
    ///
    /// Fails on the first repeated id.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> NodeflowResult<Self> {
        let mut pipeline = Self::new();
        for node in nodes {
            pipeline.push(node)?;
        }
        Ok(pipeline)
    }

    /// Append a node at the end of the pipeline
    pub fn push(&mut self, node: Node) -> NodeflowResult<()> {
        if self.contains(node.id()) {
            return Err(NodeflowError::DuplicateNodeId {
                id: node.id().to_string(),
            });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Get a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Get a node by id for label/port edits
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in pipeline order
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id()).collect()
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::new(id, Position::default(), NodeAction::declarative("DataProcessor"))
    }

    #[test]
    fn test_preserves_insertion_order() {
        let pipeline = Pipeline::from_nodes(vec![node("c"), node("a"), node("b")]).unwrap();
        assert_eq!(pipeline.node_ids(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Pipeline::from_nodes(vec![node("a"), node("b"), node("a")]);
        assert!(matches!(
            result,
            Err(NodeflowError::DuplicateNodeId { ref id }) if id == "a"
        ));
    }

    #[test]
    fn test_edit_label_in_place() {
        let mut pipeline = Pipeline::from_nodes(vec![node("a")]).unwrap();
        pipeline.get_mut("a").unwrap().set_label("Load data");
        assert_eq!(pipeline.get("a").unwrap().label(), "Load data");
        assert!(pipeline.get("missing").is_none());
    }
}
