// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Exec command - run graph nodes in-process

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use tracing::error;

use super::{load_config, stem_name};
use crate::executors::PipelineSession;
use crate::graph::GraphCodec;
use crate::report::{OverallStatus, ReportGenerator};
use crate::utils::{print_error, print_success, report_status};

/// Run the exec command
pub async fn run(graph_path: PathBuf, node: Option<String>, html: bool, verbose: bool) -> Result<()> {
    let config = load_config()?;
    let pipeline = GraphCodec::deserialize(&graph_path)?;
    let name = stem_name(&graph_path)?;

    let mut session = PipelineSession::new(ReportGenerator::new(&config.report.file));

    let result = match node {
        Some(id) => {
            let node = pipeline
                .get(&id)
                .ok_or_else(|| miette::miette!("No node '{}' in {}", id, graph_path.display()))?;
            let outcome = session.execute_node(node);
            let status = if outcome.is_ok() {
                OverallStatus::Success
            } else {
                OverallStatus::Failed
            };
            if let Err(report_err) = session.finish(&name, status) {
                // A failed node is reported ahead of a failed report write
                match outcome {
                    Ok(_) => return Err(report_err.into()),
                    Err(_) => {
                        error!(error = %report_err, "Could not write report");
                        print_error(&format!("Could not write report: {}", report_err));
                    }
                }
            }
            outcome.map(|o| vec![o])
        }
        None => session.execute_pipeline(&name, &pipeline),
    };

    match &result {
        Ok(outcomes) => {
            for outcome in outcomes {
                print_success(&format!(
                    "{} {}",
                    outcome.node_id,
                    outcome.status.to_string().dimmed()
                ));
            }
        }
        Err(e) => print_error(&e.to_string()),
    }

    let data = session.report().get_report_data();
    println!();
    println!("{} {}", "Report:".bold(), config.report.file.display());
    println!("{} {}", "Status:".bold(), report_status(data.overall_status));

    if html {
        let written = session
            .report()
            .generate_html_report(&config.report.html_file)?;
        println!("{} {}", "HTML:".bold(), written.display());
    }

    if verbose {
        if let Ok(json) = serde_json::to_string_pretty(data) {
            println!();
            println!("{}", json.dimmed());
        }
    }

    result.map(|_| ()).map_err(Into::into)
}
