//! nxstat-core — classification and aggregation engine for nxstat.
//!
//! # Architecture
//!
//! ```text
//! line ──► LineParser ──► Classifier ──► Aggregator ──► Snapshot
//!                             │
//!                         RuleTable
//! ```
//!
//! Everything here is synchronous and I/O-free; feeding lines in is the job
//! of `nxstat-feeds`, turning a [`Snapshot`] into text that of
//! `nxstat-report`.

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod types;

pub use aggregator::{Aggregator, ClientCount, FormatSummary, RepositoryCount, Snapshot, TimeSpan};
pub use classifier::{Classification, Classifier, Signal};
pub use config::Config;
pub use error::{Error, Result};
pub use parser::{LineParser, Parsed};
pub use pipeline::Pipeline;
pub use rules::{Rule, RuleSpec, RuleTable};
pub use types::{IngestSummary, LineOutcome, ParsedEntry, FALLBACK_FORMAT};
