//! CLI output formatting for passes.
//!
//! Output lists what a pass wrote, with paths relative to the source and
//! destination roots, followed by a one-line summary:
//!
//! ```text
//! index.html → index.html
//! blog/post.html → blog/post.html
//!
//! 2 regenerated, 5 up to date, 3 ignored
//! ```
//!
//! [`format_pass_report`] returns lines for testability; [`print_pass_report`]
//! writes them to stdout.

use crate::walk::PassReport;
use std::path::Path;

/// Display `path` relative to `root`, falling back to the full path.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn summary(report: &PassReport) -> String {
    format!(
        "{} regenerated, {} up to date, {} ignored",
        report.regenerated.len(),
        report.up_to_date,
        report.ignored
    )
}

/// Format a pass report for display.
pub fn format_pass_report(report: &PassReport, source_root: &Path, dest_root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .regenerated
        .iter()
        .map(|r| {
            format!(
                "{} \u{2192} {}",
                relative(&r.source, source_root),
                relative(&r.dest, dest_root)
            )
        })
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(summary(report));
    lines
}

/// Print a pass report to stdout.
pub fn print_pass_report(report: &PassReport, source_root: &Path, dest_root: &Path) {
    for line in format_pass_report(report, source_root, dest_root) {
        println!("{}", line);
    }
}
