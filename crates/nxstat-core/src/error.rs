//! Error types for nxstat-core.

use thiserror::Error;

/// Errors raised while building configuration or rule tables.
///
/// Nothing on the per-line path returns an error: unparseable lines are
/// reported as [`LineOutcome`](crate::LineOutcome) values instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The layered configuration could not be read or deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// A rule was declared without a name.
    #[error("format rule #{index} has an empty name")]
    EmptyRuleName { index: usize },

    /// A rule carries an empty pattern, which would match every request.
    #[error("format rule {rule:?} has an empty {signal} pattern")]
    EmptyPattern { rule: String, signal: &'static str },

    /// An ignore prefix was empty, which would drop every line.
    #[error("parser.ignore_prefixes contains an empty prefix")]
    EmptyIgnorePrefix,
}

/// Result type alias for nxstat-core operations.
pub type Result<T> = std::result::Result<T, Error>;
