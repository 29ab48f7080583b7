//! nxstat — package-format traffic statistics for repository manager
//! access logs.
//!
//! This crate ties the workspace layers together so that the binary and the
//! integration harnesses share one entry point.
//!
//! # Architecture
//!
//! ```text
//! Feed ──► Pipeline (parse ► classify ► record) ──► Aggregator ──► Snapshot ──► Report
//! ```
//!
//! Everything runs on the calling thread in a single streaming pass.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

pub use nxstat_core::{
    Aggregator, Classifier, Config, IngestSummary, LineOutcome, LineParser, Pipeline, Rule,
    RuleTable, Signal, Snapshot, FALLBACK_FORMAT,
};
pub use nxstat_feeds::{ingest, Feed, FeedError, FileFeed, ReaderFeed, StdinFeed};
pub use nxstat_report::{render, ReportOptions};

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub summary: IngestSummary,
    pub snapshot: Snapshot,
}

impl Analysis {
    /// Text report using the configured sections.
    pub fn render(&self, options: &ReportOptions) -> String {
        render(&self.snapshot, Some(&self.summary), options)
    }
}

/// Analyze the log at `path` (`-` for stdin) with `config`.
pub fn analyze(path: &Path, config: &Config) -> anyhow::Result<Analysis> {
    let pipeline = Pipeline::from_config(config).context("building the classification pipeline")?;
    let mut feed = nxstat_feeds::open(path)?;
    analyze_feed(&mut feed, &pipeline, config)
}

/// Analyze any feed with a prepared pipeline.
pub fn analyze_feed<F: Feed + ?Sized>(
    feed: &mut F,
    pipeline: &Pipeline,
    config: &Config,
) -> anyhow::Result<Analysis> {
    let mut aggregator = Aggregator::new();
    let summary = nxstat_feeds::ingest(feed, pipeline, &mut aggregator, config.parser.progress_interval)?;
    Ok(Analysis {
        summary,
        snapshot: aggregator.snapshot_top(config.report.top_clients),
    })
}
