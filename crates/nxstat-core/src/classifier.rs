//! Classifier — maps a parsed request to exactly one package format.
//!
//! Signals are tried in a fixed order: user agent, then file pattern, then
//! repository name. Each stage walks the whole [`RuleTable`] in table order
//! and stops at the first match, so table order breaks ties within a stage.
//! When nothing matches the request is labelled [`FALLBACK_FORMAT`].

use serde::Serialize;

use crate::rules::{Rule, RuleTable};
use crate::types::{ParsedEntry, FALLBACK_FORMAT};

/// The evidence that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    UserAgent,
    File,
    Repository,
    Fallback,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::UserAgent => write!(f, "user-agent"),
            Signal::File => write!(f, "file"),
            Signal::Repository => write!(f, "repository"),
            Signal::Fallback => write!(f, "fallback"),
        }
    }
}

/// A format label and the signal that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'r> {
    pub format: &'r str,
    pub signal: Signal,
}

/// Stateless classifier over a borrowed rule table.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    rules: &'r RuleTable,
}

impl<'r> Classifier<'r> {
    pub fn new(rules: &'r RuleTable) -> Self {
        Self { rules }
    }

    pub fn classify(&self, entry: &ParsedEntry<'_>) -> Classification<'r> {
        self.by_user_agent(entry.user_agent)
            .or_else(|| self.by_file(entry.path))
            .or_else(|| entry.repository.and_then(|repo| self.by_repository(repo)))
            .unwrap_or(Classification {
                format: FALLBACK_FORMAT,
                signal: Signal::Fallback,
            })
    }

    fn by_user_agent(&self, user_agent: &str) -> Option<Classification<'r>> {
        if user_agent.is_empty() {
            return None;
        }
        self.first_match(Signal::UserAgent, |rule| rule.matches_user_agent(user_agent))
    }

    fn by_file(&self, path: &str) -> Option<Classification<'r>> {
        self.first_match(Signal::File, |rule| rule.matches_file(path))
    }

    fn by_repository(&self, repository: &str) -> Option<Classification<'r>> {
        self.first_match(Signal::Repository, |rule| rule.matches_repository(repository))
    }

    fn first_match(
        &self,
        signal: Signal,
        matches: impl Fn(&Rule) -> bool,
    ) -> Option<Classification<'r>> {
        self.rules
            .iter()
            .find(|rule| matches(rule))
            .map(|rule| Classification {
                format: rule.name(),
                signal,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
