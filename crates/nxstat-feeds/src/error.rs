//! Error types for nxstat-feeds.

use std::path::PathBuf;

use thiserror::Error;

/// Input-level failures. These abort the run; per-line problems never
/// surface here.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot open log file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading from {name}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
