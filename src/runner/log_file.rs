// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Run log file naming
//!
//! Each run writes `<pipeline>-<run id>-<unix seconds>.log`. Run ids are 32
//! lowercase hex digits, which lets pipeline names contain dashes.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::errors::{NodeflowError, NodeflowResult};

fn log_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<pipeline>.+)-(?P<run_id>[0-9a-f]{32})-(?P<timestamp>\d+)\.log$")
            .expect("Invalid log name pattern")
    })
}

/// Components encoded in a run log file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileName {
    pub pipeline_name: String,
    pub run_id: String,
    pub timestamp: i64,
}

impl LogFileName {
    pub fn new(pipeline_name: impl Into<String>, run_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            run_id: run_id.into(),
            timestamp,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}-{}.log", self.pipeline_name, self.run_id, self.timestamp)
    }

    pub fn path_in(&self, log_dir: &Path) -> PathBuf {
        log_dir.join(self.file_name())
    }

    /// Parse a file name; `None` if it isn't a run log
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = log_name_regex().captures(file_name)?;
        Some(Self {
            pipeline_name: caps["pipeline"].to_string(),
            run_id: caps["run_id"].to_string(),
            timestamp: caps["timestamp"].parse().ok()?,
        })
    }
}

/// Find the log file of one run
pub fn find_log(log_dir: &Path, pipeline_name: &str, run_id: &str) -> NodeflowResult<Option<PathBuf>> {
    let pattern = format!(
        "{}/{}-{}-*.log",
        glob::Pattern::escape(&log_dir.to_string_lossy()),
        glob::Pattern::escape(pipeline_name),
        glob::Pattern::escape(run_id)
    );

    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| NodeflowError::Config {
            message: format!("bad log lookup pattern '{}': {}", pattern, e),
        })?
        .filter_map(Result::ok)
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(LogFileName::parse)
                .is_some_and(|name| name.pipeline_name == pipeline_name && name.run_id == run_id)
        })
        .collect();

    matches.sort();
    Ok(matches.into_iter().next())
}

/// All run logs in a directory, oldest first. A missing directory is empty.
pub fn list_logs(log_dir: &Path) -> NodeflowResult<Vec<(LogFileName, PathBuf)>> {
    if !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut logs = Vec::new();
    for entry in std::fs::read_dir(log_dir).map_err(|e| NodeflowError::io(log_dir, e))? {
        let path = entry.map_err(|e| NodeflowError::io(log_dir, e))?.path();
        let Some(name) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(LogFileName::parse)
        else {
            continue;
        };
        logs.push((name, path));
    }

    logs.sort_by(|(a, _), (b, _)| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.pipeline_name.cmp(&b.pipeline_name))
            .then_with(|| a.run_id.cmp(&b.run_id))
    });
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RUN_ID: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_parse_dashed_pipeline_name() {
        let name = LogFileName::new("build-and-test", RUN_ID, 1_700_000_000);
        let parsed = LogFileName::parse(&name.file_name()).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_parse_rejects_other_files() {
        assert!(LogFileName::parse("notes.txt").is_none());
        assert!(LogFileName::parse("demo-notahexid-123.log").is_none());
        assert!(LogFileName::parse(&format!("demo-{RUN_ID}-abc.log")).is_none());
    }

    #[test]
    fn test_find_log() {
        let temp = TempDir::new().unwrap();
        let name = LogFileName::new("demo", RUN_ID, 42);
        std::fs::write(name.path_in(temp.path()), "output").unwrap();

        let found = find_log(temp.path(), "demo", RUN_ID).unwrap();
        assert_eq!(found, Some(name.path_in(temp.path())));

        assert!(find_log(temp.path(), "other", RUN_ID).unwrap().is_none());
        // A prefix of the real name must not match
        assert!(find_log(temp.path(), "dem", RUN_ID).unwrap().is_none());
    }

    #[test]
    fn test_list_logs_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let newer = LogFileName::new("b", RUN_ID, 20);
        let older = LogFileName::new("a", RUN_ID, 10);
        std::fs::write(newer.path_in(temp.path()), "").unwrap();
        std::fs::write(older.path_in(temp.path()), "").unwrap();
        std::fs::write(temp.path().join("README"), "").unwrap();

        let logs = list_logs(temp.path()).unwrap();
        let names: Vec<&LogFileName> = logs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![&older, &newer]);
    }

    #[test]
    fn test_list_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(list_logs(&temp.path().join("nope")).unwrap().is_empty());
    }
}
