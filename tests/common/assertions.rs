//! Domain-specific assertions for nxstat harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that make it clear
//! *which* tally invariant was violated.

use nxstat::{IngestSummary, Snapshot};

/// Assert the request count recorded for a format.
///
/// ```rust
/// assert_format_count!(snapshot, "Maven", 3);
/// ```
#[macro_export]
macro_rules! assert_format_count {
    ($snapshot:expr, $format:expr, $expected:expr) => {{
        let snapshot: &nxstat::Snapshot = &$snapshot;
        let format: &str = $format;
        let expected: u64 = $expected;
        let actual = snapshot.format_count(format);
        if actual != expected {
            panic!(
                "assert_format_count! failed for {:?}:\n  expected: {}\n  actual:   {}\n  all formats: {:?}",
                format, expected, actual, snapshot.format_counts
            );
        }
    }};
}

/// Assert the ranked clients of a format as `(client, requests)` pairs.
///
/// ```rust
/// assert_top_clients!(snapshot, "npm", [("10.0.0.1", 3), ("10.0.0.2", 1)]);
/// ```
#[macro_export]
macro_rules! assert_top_clients {
    ($snapshot:expr, $format:expr, [$(($client:expr, $count:expr)),* $(,)?]) => {{
        let snapshot: &nxstat::Snapshot = &$snapshot;
        let actual: Vec<(&str, u64)> = snapshot
            .top_clients($format)
            .iter()
            .map(|c| (c.client.as_str(), c.requests))
            .collect();
        let expected: Vec<(&str, u64)> = vec![$(($client, $count)),*];
        pretty_assertions::assert_eq!(actual, expected, "top clients for {:?}", $format);
    }};
}

/// Check every structural invariant that must hold between a snapshot and
/// the summary of the run that produced it.
pub fn assert_tally_invariants(snapshot: &Snapshot, summary: &IngestSummary) {
    let format_sum: u64 = snapshot.format_counts.values().sum();
    assert_eq!(
        format_sum, summary.recorded,
        "sum(format_counts) must equal the number of recorded lines"
    );
    assert_eq!(snapshot.total, summary.recorded, "snapshot total must equal recorded lines");
    assert!(
        snapshot.repository_total() <= snapshot.total,
        "repository tally cannot exceed total"
    );
    assert_eq!(
        summary.lines,
        summary.recorded + summary.skipped(),
        "every line must have exactly one outcome"
    );

    for (format, clients) in &snapshot.format_client_counts {
        let client_sum: u64 = clients.values().sum();
        assert_eq!(
            client_sum,
            snapshot.format_count(format),
            "client tallies for {format:?} must add up to its format count"
        );
    }

    for format in &snapshot.formats {
        assert!(
            format.top_clients.len() <= clients_of(snapshot, &format.name),
            "cannot rank more clients than {:?} has",
            format.name
        );
        assert!(
            format
                .top_clients
                .windows(2)
                .all(|w| w[0].requests > w[1].requests
                    || (w[0].requests == w[1].requests && w[0].client < w[1].client)),
            "top clients for {:?} must be ranked by count, then client",
            format.name
        );
    }

    if !snapshot.is_empty() {
        assert_percentages_sum_to_100(snapshot);
    }
}

fn clients_of(snapshot: &Snapshot, format: &str) -> usize {
    snapshot
        .format_client_counts
        .get(format)
        .map_or(0, |clients| clients.len())
}

/// Percentages across formats add up to 100 within rounding tolerance.
pub fn assert_percentages_sum_to_100(snapshot: &Snapshot) {
    let sum: f64 = snapshot.formats.iter().map(|f| f.percentage).sum();
    assert!(
        (sum - 100.0).abs() <= 0.01,
        "format percentages sum to {sum}, expected 100.00 ± 0.01"
    );
}
