// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Run command - launch a workflow with the external runner

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::{load_config, stem_name};
use crate::runner::{ProcessLauncher, RunService, RunStatus};
use crate::utils::{create_spinner, hidden_spinner, print_info, print_warning, run_status};

/// Run the run command
pub async fn run(workflow: PathBuf, name: Option<String>, verbose: bool) -> Result<()> {
    if !workflow.exists() {
        return Err(miette::miette!(
            "Workflow file not found: {}\n\n\
             Run 'nodeflow compile <graph>' to create one.",
            workflow.display()
        ));
    }

    let config = load_config()?;
    let pipeline_name = match name {
        Some(name) => name,
        None => stem_name(&workflow)?,
    };

    if let Err(e) = ProcessLauncher::from_config(&config.runner).resolve() {
        print_warning(&e.to_string());
    }

    let service = RunService::from_config(&config);
    let run_id = service.execute_pipeline(&pipeline_name, &workflow)?;

    print_info(&format!("Run {} started for '{}'", run_id.cyan(), pipeline_name));

    // Log lines would tear through a live spinner
    let spinner = if verbose {
        hidden_spinner()
    } else {
        create_spinner(&format!("Running {}...", workflow.display()))
    };
    let status = service.wait(&run_id).await;
    spinner.finish_and_clear();

    let record = service.get_run(&run_id);
    println!();
    println!("{} {}", "Status:".bold(), run_status(status));
    if let Some(code) = record.as_ref().and_then(|r| r.exit_code) {
        println!("{} {}", "Exit code:".bold(), code);
    }
    if let Some(record) = &record {
        println!("{} {}", "Log:".bold(), record.log_path.display());
    }

    match status {
        RunStatus::Done => Ok(()),
        _ => Err(miette::miette!(
            "Pipeline run {} finished with status {}",
            run_id,
            status
        )),
    }
}
