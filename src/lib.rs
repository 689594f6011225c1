// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! # nodeflow - Pipeline graphs to workflows
//!
//! `nodeflow` turns a visually authored pipeline (an ordered graph of nodes
//! with ports) into a CI workflow document and runs it.
//!
//! ## Features
//!
//! - **Graph codec** - Load and save pipeline graphs as YAML documents
//! - **Workflow compiler** - One workflow step per node, in pipeline order
//! - **Run service** - Launch workflows through an external runner and poll their status
//! - **Local execution** - Run nodes in-process and write JSON/HTML execution reports
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default config
//! nodeflow init
//!
//! # Compile a graph into .github/workflows/pipeline.yml
//! nodeflow compile pipeline.yaml
//!
//! # Run it
//! nodeflow run .github/workflows/pipeline.yml --name pipeline
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod executors;
pub mod graph;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use compiler::{Workflow, WorkflowCompiler};
pub use config::NodeflowConfig;
pub use errors::{NodeflowError, NodeflowResult};
pub use executors::{NodeController, PipelineSession};
pub use graph::{GraphCodec, Node, NodeAction, Pipeline, Position};
pub use report::{ExecutionReport, OverallStatus, ReportGenerator};
pub use runner::{RunService, RunStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
