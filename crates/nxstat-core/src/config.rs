//! Configuration types for nxstat.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults,
//! `~/.config/nxstat/config.toml` (if present), and an explicit file passed on
//! the command line. [`Config::defaults`] returns the defaults without touching
//! the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::parser::LineParser;
use crate::rules::{Rule, RuleSpec, RuleTable};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[parser]
ignore_prefixes   = ["/static/rapture/"]
progress_interval = 100000

[report]
top_clients       = 3
show_repositories = true
show_summary      = true

[rules]
replace_builtin = false
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// `[parser]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Request paths starting with any of these are dropped.
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
    /// HTTP methods to count. Empty counts every method.
    #[serde(default)]
    pub methods: Vec<String>,
    /// Log a progress line every this many input lines. 0 disables.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_ignore_prefixes() -> Vec<String> { vec!["/static/rapture/".to_string()] }
fn default_progress_interval() -> u64 { 100_000 }

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            ignore_prefixes: default_ignore_prefixes(),
            methods: Vec::new(),
            progress_interval: default_progress_interval(),
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_clients")]
    pub top_clients: usize,
    #[serde(default = "default_true")]
    pub show_repositories: bool,
    #[serde(default = "default_true")]
    pub show_summary: bool,
}

fn default_top_clients() -> usize { crate::aggregator::DEFAULT_TOP_CLIENTS }
fn default_true() -> bool { true }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_clients: default_top_clients(),
            show_repositories: default_true(),
            show_summary: default_true(),
        }
    }
}

/// `[rules]` section. Each `[[rules.format]]` entry is inserted into the
/// built-in table: a known name replaces that rule in place, a new name is
/// appended at the lowest priority. `replace_builtin = true` starts from an
/// empty table instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub replace_builtin: bool,
    #[serde(default)]
    pub format: Vec<RuleSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. `explicit`, when given, must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(config_path().as_path())
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Defaults overlaid with a TOML document, without touching the filesystem.
    pub fn from_toml(overlay: &str) -> Result<Self> {
        Ok(config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(overlay, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// The effective rule table: built-in (unless replaced) plus configured formats.
    pub fn rule_table(&self) -> Result<RuleTable> {
        let mut table = if self.rules.replace_builtin {
            RuleTable::new()
        } else {
            RuleTable::builtin()
        };
        for (index, spec) in self.rules.format.iter().cloned().enumerate() {
            table.insert(Rule::from_spec(index, spec)?);
        }
        Ok(table)
    }

    pub fn line_parser(&self) -> Result<LineParser> {
        LineParser::new(&self.parser)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("nxstat")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
