// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for nodeflow.

pub mod compile;
pub mod exec;
pub mod graph;
pub mod init;
pub mod logs;
pub mod run;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::{Path, PathBuf};

use crate::config::NodeflowConfig;

/// Pipeline graph compiler and runner
///
/// Compile node graphs into workflows and run them.
#[derive(Parser, Debug)]
#[clap(
    name = "nodeflow",
    version,
    about = "Compile pipeline node graphs into workflows and run them",
    long_about = None,
    after_help = "Examples:\n\
        nodeflow init                               Write a default .nodeflow.yaml\n\
        nodeflow compile pipeline.yaml              Compile to .github/workflows/pipeline.yml\n\
        nodeflow run .github/workflows/p.yml        Run a workflow with the configured runner\n\
        nodeflow exec pipeline.yaml --html          Execute nodes locally and write a report\n\n\
        See 'nodeflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .nodeflow.yaml
    Init {
        /// Overwrite an existing config
        #[clap(short, long)]
        force: bool,
    },

    /// Compile a graph document into a workflow
    Compile {
        /// Graph document
        graph: PathBuf,

        /// Output workflow file (default: .github/workflows/<graph name>.yml)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a graph document
    Validate {
        /// Graph document
        graph: PathBuf,
    },

    /// Show the port wiring of a graph
    Graph {
        /// Graph document
        graph: PathBuf,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = GraphFormat::Text)]
        format: GraphFormat,
    },

    /// Run a compiled workflow with the external runner
    Run {
        /// Workflow file
        workflow: PathBuf,

        /// Pipeline name used for the run log (default: workflow file name)
        #[clap(short, long)]
        name: Option<String>,
    },

    /// Execute graph nodes locally and write an execution report
    Exec {
        /// Graph document
        graph: PathBuf,

        /// Execute only this node
        #[clap(long)]
        node: Option<String>,

        /// Also write the HTML report
        #[clap(long)]
        html: bool,
    },

    /// Print the log of a run
    Logs {
        /// Pipeline name
        pipeline: String,

        /// Run id
        run_id: String,
    },

    /// List runs found in the log directory
    Runs,
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

/// Load `.nodeflow.yaml` from the working directory
pub(crate) fn load_config() -> Result<NodeflowConfig> {
    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    Ok(NodeflowConfig::load_from_project(&cwd)?)
}

/// Name a pipeline after its file, without extension
pub(crate) fn stem_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| miette::miette!("Cannot derive a name from '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_name() {
        assert_eq!(stem_name(Path::new("graphs/etl-job.yaml")).unwrap(), "etl-job");
        assert!(stem_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_parse_graph_format() {
        let cli = Cli::parse_from(["nodeflow", "graph", "p.yaml", "-f", "mermaid"]);
        match cli.command {
            Commands::Graph { format, .. } => assert_eq!(format, GraphFormat::Mermaid),
            other => panic!("Expected graph command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
