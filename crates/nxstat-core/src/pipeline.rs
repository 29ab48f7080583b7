//! Pipeline — Parser → Classifier → Aggregator for one line at a time.

use tracing::{debug, trace};

use crate::aggregator::Aggregator;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::Result;
use crate::parser::{LineParser, Parsed};
use crate::rules::RuleTable;
use crate::types::LineOutcome;

/// A line parser paired with the rule table it classifies against.
#[derive(Debug, Clone)]
pub struct Pipeline {
    parser: LineParser,
    rules: RuleTable,
}

impl Pipeline {
    pub fn new(parser: LineParser, rules: RuleTable) -> Self {
        Self { parser, rules }
    }

    /// Default parser and the built-in rule table.
    pub fn builtin() -> Self {
        Self::new(LineParser::default(), RuleTable::builtin())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.line_parser()?, config.rule_table()?))
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Parse, classify and record one line. Skipped lines leave `aggregator`
    /// untouched.
    pub fn process(&self, line: &str, aggregator: &mut Aggregator) -> LineOutcome {
        let entry = match self.parser.parse(line) {
            Parsed::Entry(entry) => entry,
            Parsed::Ignored => {
                trace!(line, "ignored by filter");
                return LineOutcome::Ignored;
            }
            Parsed::Malformed => {
                debug!(line, "skipping malformed line");
                return LineOutcome::Malformed;
            }
        };

        let classification = Classifier::new(&self.rules).classify(&entry);
        trace!(
            client = entry.client_ip,
            path = entry.path,
            format = classification.format,
            signal = %classification.signal,
            "classified"
        );

        aggregator.record(entry.repository, classification.format, entry.client_ip);
        if let Some(ts) = entry.timestamp {
            aggregator.observe_timestamp(ts);
        }
        LineOutcome::Recorded
    }
}
