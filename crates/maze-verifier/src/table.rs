//! The complete transition table of the maze.

use std::fmt;

use serde::Serialize;

use crate::codec::{Configuration, StateId};
use crate::error::fatal;
use crate::maze::Token;
use crate::rules::{evaluate, Outcome};

/// Everything that can happen from one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    pub configuration: Configuration,
    /// Outcome of choosing token 0 and token 1, indexed by [`Token::index`]
    pub outcomes: [Outcome; 2],
    /// Depth at which the search first reached this configuration, 0 if never
    pub first_seen_depth: u32,
}

impl TransitionRecord {
    fn new(configuration: Configuration) -> Self {
        // Both tokens see the pre-move configuration.
        let outcomes = Token::BOTH.map(|token| evaluate(&configuration, token));
        Self {
            configuration,
            outcomes,
            first_seen_depth: 0,
        }
    }

    pub fn outcome(&self, token: Token) -> &Outcome {
        &self.outcomes[token.index()]
    }

    pub fn is_visited(&self) -> bool {
        self.first_seen_depth > 0
    }
}

impl fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.configuration)?;
        for token in Token::BOTH {
            if token == Token::One {
                f.write_str(" &")?;
            }
            let outcome = self.outcome(token);
            write!(f, " {}", outcome.primary)?;
            if let Some(alternate) = outcome.alternate {
                write!(f, " or {}", alternate)?;
            }
            write!(f, " ({})", token)?;
        }
        if self.is_visited() {
            write!(f, "  visited: {}", self.first_seen_depth)?;
        }
        Ok(())
    }
}

/// One record per configuration, addressed by [`StateId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    records: Vec<TransitionRecord>,
}

impl TransitionTable {
    /// Evaluate both tokens in every configuration.
    pub fn build() -> Self {
        let records: Vec<TransitionRecord> = StateId::all()
            .map(|id| TransitionRecord::new(id.decode()))
            .collect();
        tracing::debug!(states = records.len(), "built transition table");
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: StateId) -> &TransitionRecord {
        &self.records[id.index()]
    }

    /// Look up by raw index, aborting on anything outside the state space
    pub fn record_at(&self, index: usize) -> &TransitionRecord {
        let id = StateId::new(index).unwrap_or_else(|v| fatal(v));
        self.record(id)
    }

    pub fn record_mut(&mut self, id: StateId) -> &mut TransitionRecord {
        &mut self.records[id.index()]
    }

    pub fn lookup(&self, configuration: &Configuration) -> &TransitionRecord {
        self.record(configuration.encode())
    }

    /// Forget all first-seen depths
    pub fn reset_visits(&mut self) {
        for record in &mut self.records {
            record.first_seen_depth = 0;
        }
    }

    pub fn visited_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_visited()).count()
    }

    /// Visited records, in [`Configuration::enumerate`] order
    pub fn visited(&self) -> impl Iterator<Item = &TransitionRecord> + '_ {
        Configuration::enumerate()
            .map(move |configuration| self.lookup(&configuration))
            .filter(|record| record.is_visited())
    }

    /// Call `visitor` on every visited record, in [`Configuration::enumerate`]
    /// order.
    pub fn for_each_visited<'a>(&'a self, visitor: impl FnMut(&'a TransitionRecord)) {
        self.visited().for_each(visitor);
    }
}
