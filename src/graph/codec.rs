// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Graph document codec
//!
//! Reads and writes the YAML node list produced by the pipeline editor:
//!
//! ```yaml
//! - id: load
//!   label: Load data
//!   position: { x: 10.0, y: 20.0 }
//!   __class: DataProcessorNodeData
//!   inputPort: []
//!   outputPort: [frame]
//! ```
//!
//! Record order is pipeline order.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::node::first_duplicate;
use super::{Node, NodeAction, Pipeline, Position};
use crate::errors::{NodeflowError, NodeflowResult};

/// Suffix the editor appends to action names in `__class`
const CLASS_SUFFIX: &str = "NodeData";

/// One serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub position: Position,
    #[serde(rename = "__class")]
    pub class: String,
    #[serde(rename = "inputPort")]
    pub input_port: Vec<String>,
    #[serde(rename = "outputPort")]
    pub output_port: Vec<String>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            label: node.label().to_string(),
            position: node.position(),
            class: format!("{}{}", node.action().name(), CLASS_SUFFIX),
            input_port: node.input_ports().to_vec(),
            output_port: node.output_ports().to_vec(),
        }
    }
}

/// Port field as found in documents.
///
/// Older documents store a single port name (empty for none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortList {
    Single(String),
    Multiple(Vec<String>),
}

impl PortList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(s) if s.is_empty() => Vec::new(),
            Self::Single(s) => vec![s],
            Self::Multiple(v) => v,
        }
    }
}

/// Loosely typed record, so missing fields can be reported per record
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<serde_yaml::Value>,
    label: Option<serde_yaml::Value>,
    position: Option<RawPosition>,
    #[serde(rename = "__class")]
    class: Option<String>,
    #[serde(rename = "inputPort")]
    input_port: Option<PortList>,
    #[serde(rename = "outputPort")]
    output_port: Option<PortList>,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    x: Option<f64>,
    y: Option<f64>,
}

/// Graph document reader/writer
pub struct GraphCodec;

impl GraphCodec {
    /// Load a pipeline from a graph document on disk
    pub fn deserialize(path: &Path) -> NodeflowResult<Pipeline> {
        if !path.exists() {
            return Err(NodeflowError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| NodeflowError::io(path, e))?;

        let pipeline = Self::from_yaml(&content)?;
        debug!(path = %path.display(), nodes = pipeline.len(), "Loaded graph document");
        Ok(pipeline)
    }

    /// Parse a graph document.
    ///
    /// An empty document yields an empty pipeline.
    pub fn from_yaml(yaml: &str) -> NodeflowResult<Pipeline> {
        let document: Option<Vec<serde_yaml::Value>> = serde_yaml::from_str(yaml)?;

        let mut pipeline = Pipeline::new();
        for (index, value) in document.unwrap_or_default().into_iter().enumerate() {
            let raw: RawRecord = serde_yaml::from_value(value)
                .map_err(|e| NodeflowError::schema(index, e.to_string()))?;
            pipeline.push(Self::build_node(index, raw)?)?;
        }

        Ok(pipeline)
    }

    /// Write a pipeline as a graph document, creating parent directories
    pub fn serialize(pipeline: &Pipeline, path: &Path) -> NodeflowResult<()> {
        let yaml = Self::to_yaml(pipeline)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| NodeflowError::io(parent, e))?;
        }

        std::fs::write(path, yaml).map_err(|e| NodeflowError::io(path, e))?;
        debug!(path = %path.display(), nodes = pipeline.len(), "Wrote graph document");
        Ok(())
    }

    /// Render a pipeline as a graph document
    pub fn to_yaml(pipeline: &Pipeline) -> NodeflowResult<String> {
        let records: Vec<NodeRecord> = pipeline.iter().map(NodeRecord::from).collect();
        serde_yaml::to_string(&records).map_err(Into::into)
    }

    fn build_node(index: usize, raw: RawRecord) -> NodeflowResult<Node> {
        let id = raw
            .id
            .and_then(|v| scalar_text(index, "id", v).transpose())
            .transpose()?
            .ok_or_else(|| NodeflowError::schema(index, "missing field `id`"))?;

        let position = raw
            .position
            .ok_or_else(|| NodeflowError::schema(index, format!("node '{id}': missing field `position`")))?;
        let (Some(x), Some(y)) = (position.x, position.y) else {
            return Err(NodeflowError::schema(
                index,
                format!("node '{id}': `position` needs both `x` and `y`"),
            ));
        };

        let class = raw
            .class
            .ok_or_else(|| NodeflowError::schema(index, format!("node '{id}': missing field `__class`")))?;
        let action = class.strip_suffix(CLASS_SUFFIX).unwrap_or(&class);
        if action.is_empty() {
            return Err(NodeflowError::schema(
                index,
                format!("node '{id}': `__class` names no action"),
            ));
        }

        let input_ports = raw.input_port.map(PortList::into_vec).unwrap_or_default();
        let output_ports = raw.output_port.map(PortList::into_vec).unwrap_or_default();
        for (group, ports) in [("input", &input_ports), ("output", &output_ports)] {
            if let Some(dup) = first_duplicate(ports) {
                return Err(NodeflowError::schema(
                    index,
                    format!("node '{id}': duplicate {group} port '{dup}'"),
                ));
            }
        }

        let label = raw
            .label
            .and_then(|v| scalar_text(index, "label", v).transpose())
            .transpose()?
            .unwrap_or_else(|| id.clone());

        Node::new(id, Position::new(x, y), NodeAction::declarative(action))
            .with_label(label)
            .with_input_ports(input_ports)?
            .with_output_ports(output_ports)
    }
}

/// Text of a scalar field, so `id: 1` reads as "1". Null counts as absent.
fn scalar_text(
    index: usize,
    field: &str,
    value: serde_yaml::Value,
) -> NodeflowResult<Option<String>> {
    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(NodeflowError::schema(
            index,
            format!("field `{field}` must be a scalar"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GRAPH: &str = r#"
- id: setup
  label: Setup environment
  position:
    x: 0.0
    y: 10.5
  __class: DataProcessorNodeData
  inputPort: []
  outputPort:
    - env
- id: train
  position:
    x: 120
    y: 10.5
  __class: ModelTrainerNodeData
  inputPort: env
  outputPort: ""
"#;

    #[test]
    fn test_parse_graph_document() {
        let pipeline = GraphCodec::from_yaml(GRAPH).unwrap();
        assert_eq!(pipeline.node_ids(), vec!["setup", "train"]);

        let setup = pipeline.get("setup").unwrap();
        assert_eq!(setup.label(), "Setup environment");
        assert_eq!(setup.action().name(), "DataProcessor");
        assert_eq!(setup.output_ports(), ["env"]);

        let train = pipeline.get("train").unwrap();
        assert_eq!(train.label(), "train");
        assert_eq!(train.position(), Position::new(120.0, 10.5));
        assert_eq!(train.input_ports(), ["env"]);
        assert!(train.output_ports().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let pipeline = GraphCodec::from_yaml(GRAPH).unwrap();
        let yaml = GraphCodec::to_yaml(&pipeline).unwrap();
        let reloaded = GraphCodec::from_yaml(&yaml).unwrap();

        let before: Vec<NodeRecord> = pipeline.iter().map(NodeRecord::from).collect();
        let after: Vec<NodeRecord> = reloaded.iter().map(NodeRecord::from).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_id_is_schema_error() {
        let yaml = r#"
- id: ok
  position: {x: 0, y: 0}
  __class: DataProcessorNodeData
- position: {x: 1, y: 1}
  __class: DataProcessorNodeData
"#;
        match GraphCodec::from_yaml(yaml) {
            Err(NodeflowError::Schema { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("`id`"));
            }
            other => panic!("Expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_position_and_class() {
        let no_position = "- id: a\n  __class: DataProcessorNodeData\n";
        assert!(matches!(
            GraphCodec::from_yaml(no_position),
            Err(NodeflowError::Schema { index: 0, .. })
        ));

        let half_position = "- id: a\n  position: {x: 1}\n  __class: DataProcessorNodeData\n";
        assert!(matches!(
            GraphCodec::from_yaml(half_position),
            Err(NodeflowError::Schema { index: 0, .. })
        ));

        let no_class = "- id: a\n  position: {x: 1, y: 2}\n";
        assert!(matches!(
            GraphCodec::from_yaml(no_class),
            Err(NodeflowError::Schema { index: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let yaml = r#"
- id: a
  position: {x: 0, y: 0}
  __class: DataProcessorNodeData
- id: a
  position: {x: 1, y: 1}
  __class: ModelTrainerNodeData
"#;
        assert!(matches!(
            GraphCodec::from_yaml(yaml),
            Err(NodeflowError::DuplicateNodeId { .. })
        ));
    }

    #[test]
    fn test_empty_document() {
        assert!(GraphCodec::from_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = GraphCodec::deserialize(&temp.path().join("pipeline.yaml"));
        assert!(matches!(result, Err(NodeflowError::NotFound { .. })));
    }

    #[test]
    fn test_serialize_to_nested_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graphs").join("pipeline.yaml");

        let pipeline = GraphCodec::from_yaml(GRAPH).unwrap();
        GraphCodec::serialize(&pipeline, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("__class: ModelTrainerNodeData"));
        assert!(content.contains("inputPort:"));

        let reloaded = GraphCodec::deserialize(&path).unwrap();
        assert_eq!(reloaded.node_ids(), pipeline.node_ids());
    }

    #[test]
    fn test_numeric_id_and_label() {
        let yaml = r#"
- id: 1
  label: 7
  position: {x: 0, y: 0}
  __class: DataProcessorNodeData
"#;
        let pipeline = GraphCodec::from_yaml(yaml).unwrap();

        let node = pipeline.get("1").unwrap();
        assert_eq!(node.label(), "7");
    }

    #[test]
    fn test_structured_id_rejected() {
        let yaml = r#"
- id: [a, b]
  position: {x: 0, y: 0}
  __class: DataProcessorNodeData
"#;
        match GraphCodec::from_yaml(yaml) {
            Err(NodeflowError::Schema { index, reason }) => {
                assert_eq!(index, 0);
                assert!(reason.contains("`id`"));
            }
            other => panic!("Expected Schema error, got {other:?}"),
        }
    }
}
