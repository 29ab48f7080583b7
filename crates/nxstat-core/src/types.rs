//! Core types for nxstat-core.
//!
//! This module defines the data structures shared across the pipeline: the
//! borrowed [`ParsedEntry`] produced per line, the per-line [`LineOutcome`],
//! and the running [`IngestSummary`] diagnostics.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Label assigned when no rule in the table matches a request.
pub const FALLBACK_FORMAT: &str = "Other";

/// Fields extracted from one access-log line.
///
/// Every string borrows from the raw line; an entry lives only as long as it
/// takes to classify and record it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry<'a> {
    /// Leading token of the line.
    pub client_ip: &'a str,
    /// HTTP method of the request line (`GET`, `PUT`, …).
    pub method: &'a str,
    /// Path of the request line, query string included.
    pub path: &'a str,
    /// Repository name from a `/repository/<name>/…` path, if present.
    pub repository: Option<&'a str>,
    /// Quoted agent field after the request line, embedded quotes kept.
    /// Empty when absent or `-`.
    pub user_agent: &'a str,
    /// Bracketed request timestamp, when present and well-formed.
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// What the pipeline did with a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOutcome {
    /// Parsed, classified and counted.
    Recorded,
    /// Well-formed, but dropped by an ignore prefix or the method filter.
    Ignored,
    /// Structure not recognised; skipped.
    Malformed,
    /// Bytes were not valid UTF-8; skipped.
    Undecodable,
}

impl std::fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineOutcome::Recorded => write!(f, "recorded"),
            LineOutcome::Ignored => write!(f, "ignored"),
            LineOutcome::Malformed => write!(f, "malformed"),
            LineOutcome::Undecodable => write!(f, "undecodable"),
        }
    }
}

/// Per-run line diagnostics, tallied alongside the aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub lines: u64,
    pub recorded: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub undecodable: u64,
}

impl IngestSummary {
    pub fn observe(&mut self, outcome: LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Recorded => self.recorded += 1,
            LineOutcome::Ignored => self.ignored += 1,
            LineOutcome::Malformed => self.malformed += 1,
            LineOutcome::Undecodable => self.undecodable += 1,
        }
    }

    /// Lines that were read but not counted.
    pub fn skipped(&self) -> u64 {
        self.ignored + self.malformed + self.undecodable
    }
}
