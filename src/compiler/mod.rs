// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Workflow compiler
//!
//! Turns a pipeline into a GitHub Actions style workflow: a fixed trigger and
//! permission envelope, then one `build` job whose steps are a checkout
//! followed by one step per node in pipeline order.
//!
//! A node step only identifies its action (`run: echo "<action>"`). Tooling
//! downstream keys off that shape, so it must not change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::WorkflowConfig;
use crate::errors::{NodeflowError, NodeflowResult};
use crate::graph::{Node, Pipeline};

/// Compiled workflow document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub on: Triggers,
    pub permissions: BTreeMap<String, String>,
    pub jobs: Jobs,
}

/// Workflow triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triggers {
    pub push: BranchFilter,
    pub pull_request: BranchFilter,
    pub workflow_dispatch: BTreeMap<String, DispatchInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchFilter {
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchInput {
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jobs {
    pub build: Job,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    pub steps: Vec<Step>,
}

/// A job step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Use a published action
    Uses { uses: String },

    /// Run a shell command
    Run { name: String, run: String },
}

impl Step {
    /// Step for a pipeline node
    pub fn for_node(node: &Node) -> Self {
        Self::Run {
            name: node.label().to_string(),
            run: format!("echo \"{}\"", node.action().name()),
        }
    }
}

/// Pipeline to workflow compiler
#[derive(Debug, Clone, Default)]
pub struct WorkflowCompiler {
    config: WorkflowConfig,
}

impl WorkflowCompiler {
    /// Create a compiler with a custom envelope
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Build the workflow document for a pipeline
    pub fn build(&self, pipeline: &Pipeline) -> Workflow {
        let branch_filter = BranchFilter {
            branches: vec![String::new()],
        };

        let mut steps = Vec::with_capacity(pipeline.len() + 1);
        steps.push(Step::Uses {
            uses: self.config.checkout.clone(),
        });
        steps.extend(pipeline.iter().map(Step::for_node));

        Workflow {
            name: self.config.name.clone(),
            on: Triggers {
                push: branch_filter.clone(),
                pull_request: branch_filter,
                workflow_dispatch: BTreeMap::from([(
                    "hello".to_string(),
                    DispatchInput { required: false },
                )]),
            },
            permissions: BTreeMap::from([("contents".to_string(), "read".to_string())]),
            jobs: Jobs {
                build: Job {
                    runs_on: self.config.runs_on.clone(),
                    steps,
                },
            },
        }
    }

    /// Render the workflow for a pipeline as YAML
    pub fn render(&self, pipeline: &Pipeline) -> NodeflowResult<String> {
        serde_yaml::to_string(&self.build(pipeline)).map_err(Into::into)
    }

    /// Compile a pipeline into a workflow file.
    ///
    /// Missing parent directories are created. Returns the output path.
    pub fn compile(&self, pipeline: &Pipeline, output: &Path) -> NodeflowResult<PathBuf> {
        let yaml = self.render(pipeline)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| NodeflowError::io(parent, e))?;
        }

        std::fs::write(output, yaml).map_err(|e| NodeflowError::io(output, e))?;

        info!(
            output = %output.display(),
            steps = pipeline.len() + 1,
            "Compiled workflow"
        );
        debug!(nodes = ?pipeline.node_ids(), "Workflow step order");

        Ok(output.to_path_buf())
    }
}

/// Compile with the default envelope
pub fn compile(pipeline: &Pipeline, output: &Path) -> NodeflowResult<PathBuf> {
    WorkflowCompiler::default().compile(pipeline, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeAction, Position};
    use tempfile::TempDir;

    fn node(id: &str, action: &str) -> Node {
        Node::new(id, Position::default(), NodeAction::declarative(action))
    }

    fn sample_pipeline() -> Pipeline {
        Pipeline::from_nodes(vec![
            node("setup", "SetupEnvironment").with_label("Set up environment"),
            node("deps", "InstallDependencies"),
            node("test", "PyTest").with_label("Run tests"),
        ])
        .unwrap()
    }

    #[test]
    fn test_checkout_then_nodes() {
        let workflow = WorkflowCompiler::default().build(&sample_pipeline());
        let steps = &workflow.jobs.build.steps;

        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps[0],
            Step::Uses {
                uses: "actions/checkout@v4".into()
            }
        );
        assert_eq!(
            steps[1],
            Step::Run {
                name: "Set up environment".into(),
                run: "echo \"SetupEnvironment\"".into()
            }
        );
        assert_eq!(workflow.jobs.build.runs_on, "ubuntu-latest");
        assert_eq!(workflow.permissions["contents"], "read");
        assert!(!workflow.on.workflow_dispatch["hello"].required);
    }

    #[test]
    fn test_step_order_ignores_wiring() {
        // C feeds A, but insertion order A, B, C must win
        let pipeline = Pipeline::from_nodes(vec![
            node("A", "First").with_input_ports(["from_c"]).unwrap(),
            node("B", "Second"),
            node("C", "Third").with_output_ports(["from_c"]).unwrap(),
        ])
        .unwrap();

        let workflow = WorkflowCompiler::default().build(&pipeline);
        let names: Vec<&str> = workflow.jobs.build.steps[1..]
            .iter()
            .map(|s| match s {
                Step::Run { name, .. } => name.as_str(),
                Step::Uses { .. } => panic!("Unexpected uses step"),
            })
            .collect();

        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_compile_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join(".github").join("workflows").join("ci.yml");
        let pipeline = sample_pipeline();

        let first_path = compile(&pipeline, &output).unwrap();
        let first = std::fs::read(&first_path).unwrap();

        let second_path = compile(&pipeline, &output).unwrap();
        let second = std::fs::read(&second_path).unwrap();

        assert_eq!(first_path, output);
        assert_eq!(first, second);
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn test_rendered_yaml_parses_back() {
        let yaml = WorkflowCompiler::default().render(&sample_pipeline()).unwrap();
        let parsed: Workflow = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed, WorkflowCompiler::default().build(&sample_pipeline()));
        assert!(yaml.contains("runs-on: ubuntu-latest"));
        assert!(yaml.contains("uses: actions/checkout@v4"));
    }

    #[test]
    fn test_empty_pipeline_has_only_checkout() {
        let workflow = WorkflowCompiler::default().build(&Pipeline::new());
        assert_eq!(workflow.jobs.build.steps.len(), 1);
    }

    #[test]
    fn test_custom_envelope() {
        let compiler = WorkflowCompiler::new(WorkflowConfig {
            name: "Nightly".into(),
            runs_on: "self-hosted".into(),
            checkout: "actions/checkout@v3".into(),
        });

        let workflow = compiler.build(&sample_pipeline());
        assert_eq!(workflow.name, "Nightly");
        assert_eq!(workflow.jobs.build.runs_on, "self-hosted");
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let temp = TempDir::new().unwrap();
        // The destination is an existing directory
        let result = compile(&sample_pipeline(), temp.path());
        assert!(matches!(result, Err(NodeflowError::Io { .. })));
    }
}
