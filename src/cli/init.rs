// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Init command - write a default project config

use colored::Colorize;
use miette::Result;
use std::path::Path;

use crate::config::{generate_default_config, CONFIG_FILE};
use crate::utils::{print_header, print_success};

/// Run the init command
pub async fn run(force: bool, verbose: bool) -> Result<()> {
    print_header("Initializing nodeflow project...");

    if Path::new(CONFIG_FILE).exists() && !force {
        return Err(miette::miette!(
            "{} already exists. Use --force to overwrite.",
            CONFIG_FILE
        ));
    }

    std::fs::write(CONFIG_FILE, generate_default_config())
        .map_err(|e| miette::miette!("Failed to write {}: {}", CONFIG_FILE, e))?;

    print_success(&format!("Created {}", CONFIG_FILE));

    println!();
    println!("Next steps:");
    println!("  1. Point {} at your workflow runner", "runner.executable".cyan());
    println!("  2. Run {} to compile a graph", "nodeflow compile <graph>".cyan());
    println!("  3. Run {} to launch it", "nodeflow run <workflow>".cyan());
    println!();

    if verbose {
        println!("{}", "Generated config:".dimmed());
        println!("{}", generate_default_config().dimmed());
    }

    Ok(())
}
