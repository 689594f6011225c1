// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Port wiring view
//!
//! Connects each output port to every other node's input port of the same
//! name. Wiring is descriptive only: it never changes pipeline order and an
//! unconnected port is not an error.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::fmt;

use super::Pipeline;

/// Which side of a node a port is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A port with nothing on the other end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingPort {
    pub node_id: String,
    pub port: String,
    pub direction: PortDirection,
}

impl fmt::Display for DanglingPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let other_end = match self.direction {
            PortDirection::Input => "no producer",
            PortDirection::Output => "no consumer",
        };
        write!(
            f,
            "Node '{}': {} port '{}' has {}",
            self.node_id, self.direction, self.port, other_end
        )
    }
}

/// Graph of port connections between pipeline nodes
pub struct PortWiring {
    /// Node weights are pipeline positions, edge weights are port names
    graph: DiGraph<usize, String>,
    ids: Vec<String>,
    labels: Vec<String>,
    dangling: Vec<DanglingPort>,
}

impl PortWiring {
    /// Build the wiring view of a pipeline
    pub fn build(pipeline: &Pipeline) -> Self {
        let mut graph = DiGraph::new();
        let indices: Vec<NodeIndex> = (0..pipeline.len()).map(|i| graph.add_node(i)).collect();
        let nodes = pipeline.nodes();

        for (from, producer) in nodes.iter().enumerate() {
            for port in producer.output_ports() {
                for (to, consumer) in nodes.iter().enumerate() {
                    if from != to && consumer.input_ports().contains(port) {
                        graph.add_edge(indices[from], indices[to], port.clone());
                    }
                }
            }
        }

        let mut dangling = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            for port in node.input_ports() {
                let connected = graph
                    .edges_directed(indices[i], petgraph::Direction::Incoming)
                    .any(|e| e.weight() == port);
                if !connected {
                    dangling.push(DanglingPort {
                        node_id: node.id().to_string(),
                        port: port.clone(),
                        direction: PortDirection::Input,
                    });
                }
            }
            for port in node.output_ports() {
                let connected = graph
                    .edges_directed(indices[i], petgraph::Direction::Outgoing)
                    .any(|e| e.weight() == port);
                if !connected {
                    dangling.push(DanglingPort {
                        node_id: node.id().to_string(),
                        port: port.clone(),
                        direction: PortDirection::Output,
                    });
                }
            }
        }

        Self {
            graph,
            ids: nodes.iter().map(|n| n.id().to_string()).collect(),
            labels: nodes.iter().map(|n| n.label().to_string()).collect(),
            dangling,
        }
    }

    /// Connections as `(producer id, consumer id, port)`
    pub fn connections(&self) -> Vec<(&str, &str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.ids[self.graph[e.source()]].as_str(),
                    self.ids[self.graph[e.target()]].as_str(),
                    e.weight().as_str(),
                )
            })
            .collect()
    }

    /// Ports with no counterpart, in pipeline order
    pub fn dangling(&self) -> &[DanglingPort] {
        &self.dangling
    }

    /// Ids of the nodes feeding `node_id`
    pub fn upstream(&self, node_id: &str) -> Vec<&str> {
        let Some(pos) = self.ids.iter().position(|id| id == node_id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors_directed(NodeIndex::new(pos), petgraph::Direction::Incoming)
            .map(|n| self.ids[self.graph[n]].as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Numbered listing in pipeline order
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (i, id) in self.ids.iter().enumerate() {
            out.push_str(&format!("{}. {} ({})", i + 1, self.labels[i], id));

            let upstream = self.upstream(id);
            if !upstream.is_empty() {
                out.push_str(&format!(" [fed by: {}]", upstream.join(", ")));
            }

            out.push('\n');
        }

        out
    }

    /// Generate Mermaid diagram
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph LR\n");

        for (i, label) in self.labels.iter().enumerate() {
            out.push_str(&format!("    n{}[\"{}\"]\n", i, label.replace('"', "'")));
        }

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    n{} -->|{}| n{}\n",
                self.graph[edge.source()],
                edge.weight(),
                self.graph[edge.target()]
            ));
        }

        out
    }

    /// Generate DOT diagram
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n");
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for (id, label) in self.ids.iter().zip(&self.labels) {
            out.push_str(&format!(
                "    \"{}\" [label=\"{}\"];\n",
                id.replace('"', "\\\""),
                label.replace('"', "\\\"")
            ));
        }

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                self.ids[self.graph[edge.source()]].replace('"', "\\\""),
                self.ids[self.graph[edge.target()]].replace('"', "\\\""),
                edge.weight().replace('"', "\\\"")
            ));
        }

        out.push_str("}\n");
        out
    }
}
