// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Terminal colors
//!
//! Consistent markers and status colors across commands.

use colored::{ColoredString, Colorize};

use crate::report::OverallStatus;
use crate::runner::RunStatus;

/// Run status colored by outcome
pub fn run_status(status: RunStatus) -> ColoredString {
    match status {
        RunStatus::Done => status.as_str().green().bold(),
        RunStatus::Failed => status.as_str().red().bold(),
        RunStatus::Pending => status.as_str().yellow(),
        RunStatus::NotFound => status.as_str().dimmed(),
    }
}

/// Report status colored by outcome
pub fn report_status(status: OverallStatus) -> ColoredString {
    match status {
        OverallStatus::Success => status.as_str().green().bold(),
        OverallStatus::Failed => status.as_str().red().bold(),
        OverallStatus::Pending => status.as_str().yellow(),
    }
}

/// Print a styled header
pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!();
}

/// Print a section title
pub fn print_section(title: &str) {
    println!();
    println!("{}:", title.bold());
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

pub fn print_info(msg: &str) {
    println!("  {} {}", "→".blue(), msg);
}
