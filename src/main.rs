// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! nodeflow - Pipeline graphs to workflows
//!
//! Compile node graphs into workflow documents and run them.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nodeflow::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "nodeflow=debug" } else { "nodeflow=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Init { force } => nodeflow::cli::init::run(force, cli.verbose).await,
        Commands::Compile { graph, output } => {
            nodeflow::cli::compile::run(graph, output, cli.verbose).await
        }
        Commands::Validate { graph } => nodeflow::cli::validate::run(graph, cli.verbose).await,
        Commands::Graph { graph, format } => {
            nodeflow::cli::graph::run(graph, format, cli.verbose).await
        }
        Commands::Run { workflow, name } => {
            nodeflow::cli::run::run(workflow, name, cli.verbose).await
        }
        Commands::Exec { graph, node, html } => {
            nodeflow::cli::exec::run(graph, node, html, cli.verbose).await
        }
        Commands::Logs { pipeline, run_id } => {
            nodeflow::cli::logs::run(pipeline, run_id, cli.verbose).await
        }
        Commands::Runs => nodeflow::cli::logs::list(cli.verbose).await,
    }
}
