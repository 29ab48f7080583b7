//! Aggregator — running request tallies for one ingestion run.
//!
//! Three counters are kept side by side: per repository, per format, and per
//! (format, client). All are increment-only. [`Aggregator::snapshot`] produces
//! an owned, sorted [`Snapshot`] for rendering; recording may continue after
//! a snapshot and a later snapshot reflects the new lines.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Number of clients ranked per format when no other value is configured.
pub const DEFAULT_TOP_CLIENTS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    total: u64,
    repo_counts: HashMap<String, u64>,
    format_counts: HashMap<String, u64>,
    format_client_counts: HashMap<String, HashMap<String, u64>>,
    span: Option<TimeSpan>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified request. `repository` is only tallied when set.
    pub fn record(&mut self, repository: Option<&str>, format: &str, client: &str) {
        self.total += 1;
        bump(&mut self.format_counts, format);
        if let Some(repository) = repository {
            bump(&mut self.repo_counts, repository);
        }
        match self.format_client_counts.get_mut(format) {
            Some(clients) => bump(clients, client),
            None => {
                let clients = HashMap::from([(client.to_owned(), 1)]);
                self.format_client_counts.insert(format.to_owned(), clients);
            }
        }
    }

    /// Widen the covered time span to include `ts`.
    pub fn observe_timestamp(&mut self, ts: DateTime<FixedOffset>) {
        match &mut self.span {
            Some(span) => {
                if ts < span.first {
                    span.first = ts;
                }
                if ts > span.last {
                    span.last = ts;
                }
            }
            None => self.span = Some(TimeSpan { first: ts, last: ts }),
        }
    }

    /// Number of recorded requests so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Snapshot with the default top-3 client ranking.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_top(DEFAULT_TOP_CLIENTS)
    }

    /// Snapshot ranking the `top` busiest clients per format.
    pub fn snapshot_top(&self, top: usize) -> Snapshot {
        let mut formats: Vec<FormatSummary> = self
            .format_counts
            .iter()
            .map(|(name, &requests)| FormatSummary {
                name: name.clone(),
                requests,
                percentage: percentage(requests, self.total),
                top_clients: self
                    .format_client_counts
                    .get(name)
                    .map(|clients| top_clients(clients, top))
                    .unwrap_or_default(),
            })
            .collect();
        formats.sort_by(|a, b| b.requests.cmp(&a.requests).then_with(|| a.name.cmp(&b.name)));

        let mut repositories: Vec<RepositoryCount> = self
            .repo_counts
            .iter()
            .map(|(name, &requests)| RepositoryCount {
                name: name.clone(),
                requests,
            })
            .collect();
        repositories.sort_by(|a, b| b.requests.cmp(&a.requests).then_with(|| a.name.cmp(&b.name)));

        Snapshot {
            total: self.total,
            repo_counts: sorted(&self.repo_counts),
            format_counts: sorted(&self.format_counts),
            format_client_counts: self
                .format_client_counts
                .iter()
                .map(|(format, clients)| (format.clone(), sorted(clients)))
                .collect(),
            formats,
            repositories,
            span: self.span,
        }
    }
}

fn bump(counts: &mut HashMap<String, u64>, key: &str) {
    match counts.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            counts.insert(key.to_owned(), 1);
        }
    }
}

fn sorted(counts: &HashMap<String, u64>) -> BTreeMap<String, u64> {
    counts.iter().map(|(k, &v)| (k.clone(), v)).collect()
}

/// Busiest clients first; equal counts order by client ascending.
fn top_clients(clients: &HashMap<String, u64>, top: usize) -> Vec<ClientCount> {
    let mut ranked: Vec<ClientCount> = clients
        .iter()
        .map(|(client, &requests)| ClientCount {
            client: client.clone(),
            requests,
        })
        .collect();
    ranked.sort_by(|a, b| b.requests.cmp(&a.requests).then_with(|| a.client.cmp(&b.client)));
    ranked.truncate(top);
    ranked
}

/// `part` as a percentage of `total`; 0/0 is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// First and last request timestamps seen during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub first: DateTime<FixedOffset>,
    pub last: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCount {
    pub client: String,
    pub requests: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryCount {
    pub name: String,
    pub requests: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatSummary {
    pub name: String,
    pub requests: u64,
    /// Share of all recorded requests, 0–100.
    pub percentage: f64,
    pub top_clients: Vec<ClientCount>,
}

/// Immutable read of an [`Aggregator`].
///
/// The raw tallies are exposed as ordered maps so two snapshots of the same
/// input compare equal. `formats` and `repositories` are pre-sorted by
/// request count descending, then by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub total: u64,
    pub repo_counts: BTreeMap<String, u64>,
    pub format_counts: BTreeMap<String, u64>,
    /// format → client → requests.
    pub format_client_counts: BTreeMap<String, BTreeMap<String, u64>>,
    pub formats: Vec<FormatSummary>,
    pub repositories: Vec<RepositoryCount>,
    pub span: Option<TimeSpan>,
}

impl Snapshot {
    pub fn format_count(&self, format: &str) -> u64 {
        self.format_counts.get(format).copied().unwrap_or(0)
    }

    pub fn repo_count(&self, repository: &str) -> u64 {
        self.repo_counts.get(repository).copied().unwrap_or(0)
    }

    pub fn client_count(&self, format: &str, client: &str) -> u64 {
        self.format_client_counts
            .get(format)
            .and_then(|clients| clients.get(client))
            .copied()
            .unwrap_or(0)
    }

    /// Ranked clients for `format`; empty for a format with no requests.
    pub fn top_clients(&self, format: &str) -> &[ClientCount] {
        self.formats
            .iter()
            .find(|f| f.name == format)
            .map(|f| f.top_clients.as_slice())
            .unwrap_or(&[])
    }

    /// Requests that carried a repository name.
    pub fn repository_total(&self) -> u64 {
        self.repo_counts.values().sum()
    }

    /// Requests recorded without a repository name.
    pub fn unattributed(&self) -> u64 {
        self.total - self.repository_total()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
