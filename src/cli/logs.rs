// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Logs and runs commands - read the run log directory

use chrono::{Local, TimeZone};
use colored::Colorize;
use miette::Result;

use super::load_config;
use crate::report::DATE_FORMAT;
use crate::runner::RunService;
use crate::utils::run_status;

/// Print one run's log
pub async fn run(pipeline: String, run_id: String, _verbose: bool) -> Result<()> {
    let config = load_config()?;
    let service = RunService::from_config(&config);

    let logs = service.get_execution_logs(&pipeline, &run_id)?;
    if logs.is_empty() {
        return Err(miette::miette!(
            "No log for run '{}' of '{}' in {}",
            run_id,
            pipeline,
            service.log_dir().display()
        ));
    }

    print!("{}", logs);
    Ok(())
}

/// List runs found in the log directory
pub async fn list(verbose: bool) -> Result<()> {
    let config = load_config()?;
    let service = RunService::from_config(&config);
    let runs = service.list_runs()?;

    if runs.is_empty() {
        println!("No runs in {}", service.log_dir().display());
        return Ok(());
    }

    println!("{}", format!("Runs ({}):", runs.len()).bold());
    println!();

    for run in &runs {
        let started = Local
            .timestamp_opt(run.timestamp, 0)
            .single()
            .map(|t| t.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| run.timestamp.to_string());

        println!(
            "  {}  {}  {}  {}",
            started.dimmed(),
            run.run_id,
            run.pipeline_name.bold(),
            run_status(run.status)
        );
    }

    if verbose {
        println!();
        println!(
            "{}",
            "NOT_FOUND: run started by another nodeflow process".dimmed()
        );
    }

    Ok(())
}
