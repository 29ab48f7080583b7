//! Test builders — ergonomic constructors for access-log lines and runs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use nxstat::{ingest, Aggregator, IngestSummary, Pipeline, ReaderFeed, Snapshot};

// ---------------------------------------------------------------------------
// LogLineBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for access-log lines.
///
/// # Example
///
/// ```rust
/// let line = LogLineBuilder::new("10.0.0.7")
///     .path("/repository/npm-proxy/lodash/-/lodash-4.17.21.tgz")
///     .user_agent("npm/10.2.4 node/v20.9.0")
///     .build();
/// ```
pub struct LogLineBuilder {
    client: String,
    user: String,
    timestamp: Option<String>,
    method: String,
    path: String,
    status: u16,
    user_agent: Option<String>,
    nexus: bool,
}

impl LogLineBuilder {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            user: "-".to_string(),
            timestamp: Some("18/Oct/2026:10:00:00 +0000".to_string()),
            method: "GET".to_string(),
            path: "/".to_string(),
            status: 200,
            user_agent: None,
            nexus: true,
        }
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn no_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Emit the Apache "combined" layout (`… "referer" "agent"`) instead of
    /// the Nexus request.log layout.
    pub fn combined(mut self) -> Self {
        self.nexus = false;
        self
    }

    pub fn build(self) -> String {
        let ts = self
            .timestamp
            .map(|ts| format!("[{ts}] "))
            .unwrap_or_default();
        let request = format!("\"{} {} HTTP/1.1\"", self.method, self.path);
        let agent = self.user_agent.unwrap_or_else(|| "-".to_string());
        if self.nexus {
            format!(
                "{} - {} {ts}{request} {} - 512 3 \"{agent}\" [qtp1190524793-2410]",
                self.client, self.user, self.status
            )
        } else {
            format!(
                "{} - {} {ts}{request} {} 1234 \"-\" \"{agent}\"",
                self.client, self.user, self.status
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A Maven artifact download by a Maven client.
pub fn maven_line(client: &str) -> String {
    LogLineBuilder::new(client)
        .path("/repository/maven-central/org/apache/commons/commons-lang3/3.14.0/commons-lang3-3.14.0.jar")
        .user_agent("Apache-Maven/3.9.6 (Java 17.0.9; Linux 6.5.0)")
        .build()
}

/// An npm tarball download by the npm CLI.
pub fn npm_line(client: &str) -> String {
    LogLineBuilder::new(client)
        .path("/repository/npm-proxy/lodash/-/lodash-4.17.21.tgz")
        .user_agent("npm/10.2.4 node/v20.9.0 linux x64 workspaces/false")
        .build()
}

/// A Docker manifest pull.
pub fn docker_line(client: &str) -> String {
    LogLineBuilder::new(client)
        .path("/repository/docker-hosted/v2/library/alpine/manifests/3.19")
        .user_agent("docker/24.0.7 go/go1.20.10 git-commit/311b9ff kernel/6.5.0 os/linux arch/amd64")
        .build()
}

/// A request for a Nexus UI asset, which must never be counted.
pub fn static_line(client: &str) -> String {
    LogLineBuilder::new(client)
        .path("/static/rapture/resources/images/shared/icon.png")
        .user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0")
        .build()
}

// ---------------------------------------------------------------------------
// Run helpers
// ---------------------------------------------------------------------------

/// Run `lines` through the built-in pipeline; return the summary and snapshot.
pub fn run_lines<S: AsRef<str>>(lines: &[S]) -> (IngestSummary, Snapshot) {
    run_lines_with(&Pipeline::builtin(), lines)
}

/// Run `lines` through `pipeline`; return the summary and snapshot.
pub fn run_lines_with<S: AsRef<str>>(pipeline: &Pipeline, lines: &[S]) -> (IngestSummary, Snapshot) {
    let mut aggregator = Aggregator::new();
    let summary = feed_lines(pipeline, &mut aggregator, lines);
    (summary, aggregator.snapshot())
}

/// Stream `lines` into an existing aggregator.
pub fn feed_lines<S: AsRef<str>>(
    pipeline: &Pipeline,
    aggregator: &mut Aggregator,
    lines: &[S],
) -> IngestSummary {
    let text = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    let mut feed = ReaderFeed::new("test", text.as_bytes());
    ingest(&mut feed, pipeline, aggregator, 0).expect("in-memory feed cannot fail")
}
