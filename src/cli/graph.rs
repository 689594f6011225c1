// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Graph command - show port wiring

use miette::Result;
use std::path::PathBuf;

use super::GraphFormat;
use crate::graph::{GraphCodec, PortWiring};

/// Run the graph command
pub async fn run(graph_path: PathBuf, format: GraphFormat, _verbose: bool) -> Result<()> {
    let pipeline = GraphCodec::deserialize(&graph_path)?;
    let wiring = PortWiring::build(&pipeline);

    let output = match format {
        GraphFormat::Text => wiring.to_text(),
        GraphFormat::Dot => wiring.to_dot(),
        GraphFormat::Mermaid => wiring.to_mermaid(),
    };

    println!("{}", output);

    Ok(())
}
