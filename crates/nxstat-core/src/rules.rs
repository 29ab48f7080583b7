//! Rule table — the ordered set of package-format detection rules.
//!
//! A [`Rule`] names a format and lists substrings for each of the three
//! classification signals. A [`RuleTable`] keeps rules in priority order:
//! when two rules match the same input in the same signal stage, the one
//! that appears first wins.
//!
//! The built-in table is embedded in the binary via [`include_str!`] so the
//! tool works without any files on disk. Callers extend or replace it through
//! [`RuleTable::insert`] or the `[[rules.format]]` configuration section.

use config::{Config, File, FileFormat};
use serde::Deserialize;

use tracing::warn;

use crate::error::{Error, Result};

const BUILTIN_RULES_SRC: &str = include_str!("rules/builtin.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

/// One `[[format]]` entry as written in TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub user_agents: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    format: Vec<RuleSpec>,
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// Detection patterns for a single package format.
///
/// Patterns are stored lowercased; matching is ASCII case-insensitive. The
/// builder methods skip empty patterns, which would otherwise match every
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    user_agents: Vec<String>,
    files: Vec<String>,
    repositories: Vec<String>,
}

impl Rule {
    /// Start a rule with no patterns. Chain [`Rule::user_agents`],
    /// [`Rule::files`] and [`Rule::repositories`] to populate it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_agents: Vec::new(),
            files: Vec::new(),
            repositories: Vec::new(),
        }
    }

    pub fn user_agents<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.user_agents.extend(lowercase_all(patterns));
        self
    }

    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.files.extend(lowercase_all(patterns));
        self
    }

    pub fn repositories<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.repositories.extend(lowercase_all(patterns));
        self
    }

    /// Validate a TOML rule and convert it. `index` is only used in errors.
    pub fn from_spec(index: usize, spec: RuleSpec) -> Result<Self> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(Error::EmptyRuleName { index });
        }
        for (signal, patterns) in [
            ("user agent", &spec.user_agents),
            ("file", &spec.files),
            ("repository", &spec.repositories),
        ] {
            if patterns.iter().any(|p| p.is_empty()) {
                return Err(Error::EmptyPattern {
                    rule: name.to_string(),
                    signal,
                });
            }
        }
        let rule = Rule::new(name)
            .user_agents(&spec.user_agents)
            .files(&spec.files)
            .repositories(&spec.repositories);
        if !rule.has_patterns() {
            warn!(rule = name, "format rule has no patterns and never matches");
        }
        Ok(rule)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if `user_agent` contains any of this rule's user-agent patterns.
    pub fn matches_user_agent(&self, user_agent: &str) -> bool {
        contains_any(user_agent, &self.user_agents)
    }

    /// True if `path` contains any of this rule's file patterns.
    pub fn matches_file(&self, path: &str) -> bool {
        contains_any(path, &self.files)
    }

    /// True if `repository` contains any of this rule's repository patterns.
    pub fn matches_repository(&self, repository: &str) -> bool {
        contains_any(repository, &self.repositories)
    }

    /// True if the rule has at least one pattern in any signal.
    pub fn has_patterns(&self) -> bool {
        !(self.user_agents.is_empty() && self.files.is_empty() && self.repositories.is_empty())
    }
}

fn lowercase_all<I, S>(patterns: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .filter(|p| !p.as_ref().is_empty())
        .map(|p| p.as_ref().to_lowercase())
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| contains_ignore_ascii_case(haystack, needle))
}

/// Substring test that folds ASCII case without allocating.
pub(crate) fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let (hay, needle) = (haystack.as_bytes(), needle.as_bytes());
    if needle.is_empty() {
        return true;
    }
    if needle.len() > hay.len() {
        return false;
    }
    hay.windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

// ---------------------------------------------------------------------------
// RuleTable
// ---------------------------------------------------------------------------

/// Ordered collection of [`Rule`]s. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// An empty table. Every request classifies as the fallback format.
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded default table.
    pub fn builtin() -> Self {
        let raw: RawTable = Config::builder()
            .add_source(File::from_str(BUILTIN_RULES_SRC, FileFormat::Toml))
            .build()
            .expect("built-in rule table must be valid TOML")
            .try_deserialize()
            .expect("built-in rule table must deserialize correctly");
        Self::from_specs(raw.format).expect("built-in rules must be valid")
    }

    /// Build a table from TOML rule specs, in order.
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self> {
        let mut table = Self::new();
        for (index, spec) in specs.into_iter().enumerate() {
            table.insert(Rule::from_spec(index, spec)?);
        }
        Ok(table)
    }

    /// Add a rule at the lowest priority, or replace the rule of the same
    /// name in place (keeping its priority). Returns the replaced rule.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => Some(std::mem::replace(existing, rule)),
            None => {
                self.rules.push(rule);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Rule::name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        let mut table = Self::new();
        for rule in iter {
            table.insert(rule);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
