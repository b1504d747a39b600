//! State-space search for the self-referential "cows" maze.
//!
//! Two pencils sit on numbered boxes; choosing a pencil means following
//! the sentence in its box, which usually asks something about the box
//! under the other pencil. This crate builds the full transition table of
//! that machine and searches it depth-first for a path to the goal.

pub mod codec;
pub mod error;
pub mod maze;
pub mod rules;
pub mod solver;
pub mod table;

// Re-export main types
pub use codec::{Configuration, StateId, STATE_COUNT};
pub use error::DomainViolation;
pub use maze::{MazePoint, Position, Token, MAZE_POINT_CODES, MAZE_POINT_COUNT};
pub use rules::{evaluate, Outcome, Verdict};
pub use solver::{traverse, GoalEvent, IllegalEvent, SearchConfig, SearchReport};
pub use table::{TransitionRecord, TransitionTable};
