//! Depth-first reachability search over the transition table.
//!
//! Every configuration remembers the shallowest depth at which the search
//! reached it. A configuration met again at that depth or deeper cannot lead
//! anywhere new and is skipped; met shallower, it is expanded again. With
//! 2048 configurations this bounds the search to a small multiple of the
//! state space even though each configuration has up to four successors.

use serde::Serialize;
use smallvec::SmallVec;

use crate::codec::{Configuration, StateId, STATE_COUNT};
use crate::error::fatal;
use crate::maze::{MazePoint, Position, Token};
use crate::table::TransitionTable;

/// Default number of path entries kept for goal traces
pub const DEFAULT_TRACE_CAPACITY: usize = 300;

/// Configuration for a search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Where the search starts; both tokens must be on boxes
    pub start: Configuration,
    /// Path depths recorded for goal traces
    pub trace_capacity: usize,
}

impl SearchConfig {
    /// Pencils on box 1 and box 7, as the puzzle prescribes
    pub fn start_position() -> Configuration {
        let point = |code| MazePoint::new(code).unwrap_or_else(|v| fatal(v));
        Configuration::at(point(1), point(7))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start: Self::start_position(),
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

/// A successor with a token on the goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalEvent {
    /// Depth of the configuration the goal was reached from
    pub depth: u32,
    /// Path from the start to that configuration, cut at the trace capacity
    pub trace: Vec<Configuration>,
}

/// A successor with both tokens deadlocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IllegalEvent {
    pub depth: u32,
}

/// Result of a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    /// Deepest configuration expanded
    pub max_depth: u32,
    pub goal_events: Vec<GoalEvent>,
    pub illegal_events: Vec<IllegalEvent>,
    /// Expansions, counting re-expansions at a shallower depth
    pub states_expanded: usize,
}

impl SearchReport {
    pub fn goal_reached(&self) -> bool {
        !self.goal_events.is_empty()
    }

    /// Shallowest goal event, if any
    pub fn shallowest_goal(&self) -> Option<&GoalEvent> {
        self.goal_events.iter().min_by_key(|event| event.depth)
    }
}

/// Configurations along the current path, one per depth.
///
/// Only the first `capacity` depths are kept. Deeper configurations are not
/// recorded, and goal traces found below that depth are truncated.
#[derive(Debug)]
struct TraceBuffer {
    capacity: usize,
    entries: Vec<Configuration>,
}

impl TraceBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            // A path never repeats a configuration.
            entries: Vec::with_capacity(capacity.min(STATE_COUNT)),
        }
    }

    fn record(&mut self, depth: u32, configuration: Configuration) {
        let slot = depth as usize - 1;
        if slot >= self.capacity {
            return;
        }
        // Anything past this slot belongs to an abandoned branch.
        self.entries.truncate(slot);
        self.entries.push(configuration);
    }

    fn path_to(&self, depth: u32) -> Vec<Configuration> {
        let len = (depth as usize).min(self.entries.len());
        self.entries[..len].to_vec()
    }
}

/// One successor of a configuration
#[derive(Debug, Clone, Copy)]
struct Branch {
    token: Token,
    alternate: bool,
}

/// Visiting order: each token's primary successor, then its alternate.
const BRANCHES: [Branch; 4] = [
    Branch { token: Token::Zero, alternate: false },
    Branch { token: Token::Zero, alternate: true },
    Branch { token: Token::One, alternate: false },
    Branch { token: Token::One, alternate: true },
];

/// A configuration on the current path
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: StateId,
    depth: u32,
    next_branch: u8,
}

impl Frame {
    fn new(id: StateId, depth: u32) -> Self {
        Self {
            id,
            depth,
            next_branch: 0,
        }
    }

    fn advance(&mut self) -> Option<Branch> {
        let branch = BRANCHES.get(self.next_branch as usize).copied()?;
        self.next_branch += 1;
        Some(branch)
    }
}

struct Search<'t> {
    table: &'t mut TransitionTable,
    trace: TraceBuffer,
    report: SearchReport,
}

impl Search<'_> {
    /// Stamp `id` with `depth` unless it was already reached as shallow.
    fn enter(&mut self, id: StateId, depth: u32) -> bool {
        let record = self.table.record_mut(id);
        if record.is_visited() && record.first_seen_depth <= depth {
            return false;
        }
        record.first_seen_depth = depth;
        let configuration = record.configuration;

        self.trace.record(depth, configuration);
        self.report.max_depth = self.report.max_depth.max(depth);
        self.report.states_expanded += 1;
        true
    }

    fn run(&mut self, start: StateId) {
        // Explicit stack: paths run to a few hundred configurations.
        let mut stack: SmallVec<[Frame; 64]> = SmallVec::new();
        if self.enter(start, 1) {
            stack.push(Frame::new(start, 1));
        }

        while let Some(frame) = stack.last_mut() {
            let (id, depth) = (frame.id, frame.depth);
            let Some(branch) = frame.advance() else {
                stack.pop();
                continue;
            };

            let record = self.table.record(id);
            let outcome = record.outcome(branch.token);
            let next = if branch.alternate {
                match outcome.alternate {
                    Some(alternate) => alternate,
                    None => continue,
                }
            } else {
                outcome.primary
            };

            if next.is_illegal() {
                tracing::warn!(
                    depth,
                    from = %record.configuration,
                    token = %branch.token,
                    "illegal state encountered"
                );
                self.report.illegal_events.push(IllegalEvent { depth });
                // Nothing else is tried from a configuration that can deadlock.
                stack.pop();
            } else if next.is_goal() {
                tracing::info!(
                    depth,
                    from = %record.configuration,
                    token = %branch.token,
                    "goal state encountered"
                );
                let trace = self.trace.path_to(depth);
                self.report.goal_events.push(GoalEvent { depth, trace });
                stack.pop();
            } else {
                let next_id = next.encode();
                if self.enter(next_id, depth + 1) {
                    stack.push(Frame::new(next_id, depth + 1));
                }
            }
        }
    }
}

/// Search the table from `config.start` until every branch is exhausted.
///
/// First-seen depths are written into `table` and left there for
/// [`TransitionTable::for_each_visited`]. A second search on the same table
/// only re-expands configurations it reaches shallower than before; call
/// [`TransitionTable::reset_visits`] for an independent run.
pub fn traverse(table: &mut TransitionTable, config: &SearchConfig) -> SearchReport {
    let start = config.start.encode();
    let mut search = Search {
        table,
        trace: TraceBuffer::new(config.trace_capacity),
        report: SearchReport::default(),
    };
    search.run(start);

    let report = search.report;
    tracing::debug!(
        max_depth = report.max_depth,
        expanded = report.states_expanded,
        goals = report.goal_events.len(),
        illegal = report.illegal_events.len(),
        "search exhausted"
    );
    report
}

/// Is `position` where a token ends up on some path from the start?
///
/// Convenience over a fresh table; the table is discarded afterwards.
pub fn reaches(config: &SearchConfig, position: Position) -> bool {
    let mut table = TransitionTable::build();
    let report = traverse(&mut table, config);
    match position {
        Position::Goal => report.goal_reached(),
        Position::Illegal => !report.illegal_events.is_empty(),
        Position::At(point) => {
            let mut found = false;
            table.for_each_visited(|record| {
                found |= record.configuration.tokens.contains(&Position::At(point));
            });
            found
        }
    }
}
