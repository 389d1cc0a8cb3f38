use crate::batch::BatchReport;
use std::fmt::Write as _;
use std::path::Path;

const RULE_WIDTH: usize = 50;

pub fn render_markdown(report: &BatchReport) -> String {
    let mut out = String::from("# Batch Summarization Results\n\n");
    for (path, result) in report.iter() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let _ = write!(
            out,
            "## {name}\n**File:** {}\n\n{result}\n\n---\n\n",
            path.display()
        );
    }
    out
}

pub fn save_report(report: &BatchReport, output: &Path) -> std::io::Result<()> {
    std::fs::write(output, render_markdown(report))
}

pub fn render_summary(summary: &str) -> String {
    format!("Summary:\n{}\n{summary}\n", "=".repeat(RULE_WIDTH))
}

pub fn render_terminal(report: &BatchReport) -> String {
    let mut out = String::new();
    for (path, result) in report.iter() {
        let _ = write!(out, "{}:\n{result}\n{}\n", path.display(), "-".repeat(RULE_WIDTH));
    }
    out
}
