// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Compile command - graph document to workflow file

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use super::{load_config, stem_name};
use crate::compiler::WorkflowCompiler;
use crate::graph::GraphCodec;
use crate::utils::print_success;

/// Directory compiled workflows go to by default
const WORKFLOWS_DIR: &str = ".github/workflows";

/// Run the compile command
pub async fn run(graph_path: PathBuf, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let config = load_config()?;
    let pipeline = GraphCodec::deserialize(&graph_path)?;

    let output = match output {
        Some(path) => path,
        None => default_output(&graph_path)?,
    };

    let compiler = WorkflowCompiler::new(config.workflow);
    let written = compiler.compile(&pipeline, &output)?;

    print_success(&format!(
        "Compiled {} nodes to {}",
        pipeline.len(),
        written.display().to_string().cyan()
    ));

    if verbose {
        for (i, node) in pipeline.iter().enumerate() {
            println!(
                "    {}. {} {}",
                i + 1,
                node.label(),
                format!("({})", node.action().name()).dimmed()
            );
        }
    }

    Ok(())
}

fn default_output(graph_path: &Path) -> Result<PathBuf> {
    Ok(Path::new(WORKFLOWS_DIR).join(format!("{}.yml", stem_name(graph_path)?)))
}
