//! nxstat-report — fixed-width text rendering of a [`Snapshot`].
//!
//! The layout follows the classic three-table report: repository breakdown,
//! package format summary with percentages, and the busiest clients per
//! format, optionally followed by input diagnostics.

pub mod format;

use nxstat_core::{IngestSummary, Snapshot};

use crate::format::{percent, thousands};

const HEAVY_RULE: &str = "============================================================";
const LIGHT_RULE: &str = "------------------------------------------------------------";
const SPAN_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Which sections to render and how many clients to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_clients: usize,
    pub show_repositories: bool,
    pub show_summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_clients: nxstat_core::aggregator::DEFAULT_TOP_CLIENTS,
            show_repositories: true,
            show_summary: true,
        }
    }
}

impl From<&nxstat_core::config::ReportConfig> for ReportOptions {
    fn from(config: &nxstat_core::config::ReportConfig) -> Self {
        Self {
            top_clients: config.top_clients,
            show_repositories: config.show_repositories,
            show_summary: config.show_summary,
        }
    }
}

/// Render the full report. `summary` feeds the optional INPUT SUMMARY footer.
///
/// The snapshot should have been taken with the same `top_clients` value;
/// extra ranked clients are cut, missing ones cannot be invented.
pub fn render(snapshot: &Snapshot, summary: Option<&IngestSummary>, options: &ReportOptions) -> String {
    let mut out = Vec::new();
    if options.show_repositories {
        repositories(&mut out, snapshot);
    }
    formats(&mut out, snapshot);
    top_clients(&mut out, snapshot, options.top_clients);
    if let (true, Some(summary)) = (options.show_summary, summary) {
        input_summary(&mut out, snapshot, summary);
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn heading(out: &mut Vec<String>, title: &str) {
    out.push(HEAVY_RULE.to_string());
    out.push(title.to_string());
    out.push(HEAVY_RULE.to_string());
}

/// REPOSITORY ACCESS BREAKDOWN.
pub fn repositories(out: &mut Vec<String>, snapshot: &Snapshot) {
    heading(out, "REPOSITORY ACCESS BREAKDOWN");
    out.push(format!("{:>10} | Repository", "Requests"));
    out.push(LIGHT_RULE.to_string());
    for repo in &snapshot.repositories {
        out.push(format!("{:>10} | {}", thousands(repo.requests), repo.name));
    }
    let unattributed = snapshot.unattributed();
    if unattributed > 0 {
        out.push(format!("{:>10} | (no repository)", thousands(unattributed)));
    }
    out.push(LIGHT_RULE.to_string());
    out.push(format!("{:>10} | TOTAL", thousands(snapshot.total)));
    out.push(String::new());
}

/// PACKAGE FORMAT SUMMARY.
pub fn formats(out: &mut Vec<String>, snapshot: &Snapshot) {
    heading(out, "PACKAGE FORMAT SUMMARY");
    out.push(format!("{:>10} | {:>10} | Format", "Requests", "Percentage"));
    out.push(LIGHT_RULE.to_string());
    for format in &snapshot.formats {
        out.push(format!(
            "{:>10} | {} | {}",
            thousands(format.requests),
            percent(format.percentage),
            format.name
        ));
    }
    out.push(LIGHT_RULE.to_string());
    let total_pct = if snapshot.is_empty() { 0.0 } else { 100.0 };
    out.push(format!(
        "{:>10} | {} | TOTAL",
        thousands(snapshot.total),
        percent(total_pct)
    ));
    out.push(String::new());
}

/// TOP N CLIENTS PER PACKAGE FORMAT.
pub fn top_clients(out: &mut Vec<String>, snapshot: &Snapshot, top: usize) {
    heading(out, &format!("TOP {top} CLIENTS PER PACKAGE FORMAT"));
    for format in snapshot.formats.iter().filter(|f| f.requests > 0) {
        out.push(String::new());
        out.push(format!("{}:", format.name));
        out.push(format!("  Rank | {:>10} | Client", "Requests"));
        out.push(format!("  {} | {} | {}", "-".repeat(4), "-".repeat(10), "-".repeat(18)));
        for (rank, client) in format.top_clients.iter().take(top).enumerate() {
            out.push(format!(
                "{:>6} | {:>10} | {}",
                rank + 1,
                thousands(client.requests),
                client.client
            ));
        }
    }
    out.push(String::new());
}

/// INPUT SUMMARY footer.
pub fn input_summary(out: &mut Vec<String>, snapshot: &Snapshot, summary: &IngestSummary) {
    heading(out, "INPUT SUMMARY");
    for (label, value) in [
        ("Lines read", summary.lines),
        ("Recorded", summary.recorded),
        ("Ignored", summary.ignored),
        ("Malformed", summary.malformed),
        ("Undecodable", summary.undecodable),
    ] {
        out.push(format!("{:<12} {:>10}", format!("{label}:"), thousands(value)));
    }
    if let Some(span) = snapshot.span {
        out.push(format!(
            "{:<12} {} .. {}",
            "Period:",
            span.first.format(SPAN_FORMAT),
            span.last.format(SPAN_FORMAT)
        ));
    }
    out.push(String::new());
}
