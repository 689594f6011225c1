// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! HTML rendering of execution reports

use super::{ExecutionReport, NodeReport};

/// Render a report as a standalone HTML page
pub fn render_html(report: &ExecutionReport) -> String {
    let pipeline_name = escape(report.pipeline_name.as_deref().unwrap_or("None"));
    let execution_date = escape(report.execution_date.as_deref().unwrap_or("None"));
    let overall_status = escape(report.overall_status.as_str());
    let nodes: String = report.nodes.iter().map(render_node).collect();

    format!(
        r##"<html>
<head>
    <title>Pipeline Execution Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        h1, h2 {{ color: #333; }}
        ul {{ list-style-type: none; padding: 0; }}
        li {{ margin-bottom: 10px; border: 1px solid #ccc; padding: 10px; }}
    </style>
</head>
<body>
    <h1>Pipeline Execution Report</h1>
    <p><strong>Pipeline Name:</strong> {pipeline_name}</p>
    <p><strong>Execution Date:</strong> {execution_date}</p>
    <p><strong>Overall Status:</strong> {overall_status}</p>
    <h2>Node Execution Details:</h2>
    <ul>
{nodes}    </ul>
</body>
</html>
"##
    )
}

fn render_node(node: &NodeReport) -> String {
    let details = match &node.details {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    format!(
        r#"        <li>
            <strong>Node ID:</strong> {}<br>
            <strong>Status:</strong> {}<br>
            <strong>Details:</strong> {}
        </li>
"#,
        escape(&node.node_id),
        escape(&node.status),
        escape(&details)
    )
}

/// Escape text for HTML element and attribute content
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OverallStatus;
    use serde_json::json;

    #[test]
    fn test_escapes_user_text() {
        let report = ExecutionReport {
            pipeline_name: Some("<script>alert(1)</script>".into()),
            execution_date: Some("2025-01-01 00:00:00".into()),
            nodes: vec![NodeReport {
                node_id: "a&b".into(),
                status: "success".into(),
                details: json!({"msg": "<ok>"}),
            }],
            overall_status: OverallStatus::Success,
        };

        let html = render_html(&report);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
        assert!(html.contains("&quot;msg&quot;"));
        assert!(html.contains("<strong>Overall Status:</strong> success"));
    }

    #[test]
    fn test_unfinalized_report() {
        let html = render_html(&ExecutionReport::default());
        assert!(html.contains("<strong>Execution Date:</strong> None"));
        assert!(html.contains("<strong>Overall Status:</strong> Pending"));
        assert!(!html.contains("<li>"));
    }
}
