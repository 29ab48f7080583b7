//! Line parser — extracts request fields from one access-log line.
//!
//! Two layouts are accepted, both keyed on the quoted HTTP request line:
//!
//! ```text
//! 10.0.0.7 - alice [18/Oct/2026:10:00:00 +0000] "GET /repository/npm-proxy/lodash HTTP/1.1" 200 - 512 4 "npm/10.2.4 node/v20.9.0" [qtp-41]
//! 192.168.1.12 - - "GET /repository/maven-central/org/foo/foo.jar HTTP/1.1" 200 1234 "-" "Apache-Maven/3.8.5"
//! ```
//!
//! The client is the leading token and the bracketed timestamp is optional.
//! The user agent runs from its opening quote to the last quote before the
//! optional `[thread]` suffix, so agents with embedded quotes (pip sends a
//! JSON blob) stay whole. In the combined layout a referer field comes first
//! and is skipped.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::types::ParsedEntry;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<ip>\S+)\s[^"\[]*(?:\[(?P<ts>[^\]]*)\]\s*)?"(?P<method>[A-Za-z]+)\s+(?P<path>[^\s"]+)[^"]*"(?P<tail>.*)$"#,
    )
    .expect("access-log line pattern must compile")
});

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";
const REPOSITORY_PREFIX: &str = "/repository/";

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<'a> {
    Entry(ParsedEntry<'a>),
    /// Well-formed, but filtered out before classification.
    Ignored,
    /// The line does not have the expected shape.
    Malformed,
}

/// Access-log line parser with its filters.
#[derive(Debug, Clone)]
pub struct LineParser {
    ignore_prefixes: Vec<String>,
    methods: Vec<String>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self {
            ignore_prefixes: ParserConfig::default().ignore_prefixes,
            methods: Vec::new(),
        }
    }
}

impl LineParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        if config.ignore_prefixes.iter().any(|p| p.is_empty()) {
            return Err(Error::EmptyIgnorePrefix);
        }
        Ok(Self {
            ignore_prefixes: config.ignore_prefixes.clone(),
            methods: config.methods.clone(),
        })
    }

    pub fn parse<'a>(&self, line: &'a str) -> Parsed<'a> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(caps) = LINE_RE.captures(line) else {
            return Parsed::Malformed;
        };
        let (Some(ip), Some(method), Some(path)) =
            (caps.name("ip"), caps.name("method"), caps.name("path"))
        else {
            return Parsed::Malformed;
        };
        let (method, path) = (method.as_str(), path.as_str());

        if self.is_ignored(method, path) {
            return Parsed::Ignored;
        }

        let tail = caps.name("tail").map_or("", |m| m.as_str());
        Parsed::Entry(ParsedEntry {
            client_ip: ip.as_str(),
            method,
            path,
            repository: repository_name(path),
            user_agent: user_agent(tail),
            timestamp: caps.name("ts").and_then(|m| parse_timestamp(m.as_str())),
        })
    }

    fn is_ignored(&self, method: &str, path: &str) -> bool {
        if self.ignore_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return true;
        }
        !self.methods.is_empty() && !self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// `/repository/<name>/…` → `<name>`.
pub fn repository_name(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(REPOSITORY_PREFIX)?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

fn user_agent(tail: &str) -> &str {
    let mut fields = tail.trim_end();
    if fields.ends_with(']') {
        if let Some(open) = fields.rfind('[') {
            fields = fields[..open].trim_end();
        }
    }
    let Some(fields) = fields.strip_suffix('"') else {
        return "";
    };
    let Some(open) = fields.find('"') else {
        return "";
    };
    let mut agent = &fields[open + 1..];

    // A referer ends at its first quote and is followed by the agent's own.
    if let Some(close) = agent.find('"') {
        let rest = &agent[close + 1..];
        let next = rest.trim_start();
        if next.len() < rest.len() {
            if let Some(quoted) = next.strip_prefix('"') {
                agent = quoted;
            }
        }
    }

    match agent {
        "-" => "",
        ua => ua,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
