// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Validate command - check a graph document

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::executors::NodeKind;
use crate::graph::{GraphCodec, PortWiring};
use crate::utils::{print_header, print_section, print_success, print_warning};

/// Run the validate command
pub async fn run(graph_path: PathBuf, verbose: bool) -> Result<()> {
    print_header("Validating graph...");

    let pipeline = match GraphCodec::deserialize(&graph_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {} Failed to load graph", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    print_success(&format!("{} nodes with unique ids", pipeline.len()));

    let wiring = PortWiring::build(&pipeline);
    print_success(&format!("{} port connections", wiring.connections().len()));

    // Advisory only: ports and kinds never block compilation
    let unknown: Vec<_> = pipeline
        .iter()
        .filter(|node| node.action().name().parse::<NodeKind>().is_err())
        .collect();

    if !wiring.dangling().is_empty() {
        print_section(&"Dangling ports".yellow().to_string());
        for dangling in wiring.dangling() {
            print_warning(&dangling.to_string());
        }
    }

    if !unknown.is_empty() {
        print_section(&"Not executable locally".yellow().to_string());
        for node in &unknown {
            print_warning(&format!("{} ({})", node.id(), node.action().name()));
        }
    }

    if verbose {
        print_section("Nodes");
        for (i, node) in pipeline.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                node,
                format!("[{}]", node.action().name()).dimmed()
            );
        }
    }

    println!();

    if wiring.dangling().is_empty() && unknown.is_empty() {
        println!("{}", "Graph is valid!".green().bold());
    } else {
        println!("{}", "Graph is valid but has warnings.".yellow().bold());
    }

    Ok(())
}
