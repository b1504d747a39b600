//! Domain violations.
//!
//! The legal input domain of the maze is closed and fully enumerable, so
//! every value outside it points at a logic defect. Internal callers treat
//! these as fatal via [`fatal`]; the `try_*` constructors hand them back as
//! a `Result` only so that user-supplied input can be rejected cleanly.

use thiserror::Error;

use crate::maze::Position;

/// A value outside the closed domain of the maze
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainViolation {
    /// Code is not one of the 16 boxes of the maze
    #[error("{0} is not a maze point")]
    UnknownMazePoint(u8),

    /// Ordinal outside the sorted list of maze points
    #[error("maze point ordinal {0} out of range")]
    OrdinalOutOfRange(usize),

    /// Dense state id outside the state space
    #[error("state id {0} out of range")]
    StateIdOutOfRange(usize),

    /// A sentinel position was used where a maze point is required
    #[error("token {token} is at {position}, not on a maze point")]
    NotOnMazePoint { token: usize, position: Position },

    /// Token index other than 0 or 1
    #[error("token index {0} out of range")]
    TokenOutOfRange(usize),

    /// Maze point without a decision rule
    #[error("no rule defined for box {0}")]
    UndefinedRule(u8),
}

/// Abort on a domain violation.
///
/// Logged before panicking so the cause survives even when the panic
/// message is swallowed by the caller.
#[track_caller]
pub fn fatal(violation: DomainViolation) -> ! {
    tracing::error!(%violation, "domain violation");
    panic!("domain violation: {violation}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_messages() {
        assert_eq!(
            DomainViolation::UnknownMazePoint(3).to_string(),
            "3 is not a maze point"
        );
        assert_eq!(
            DomainViolation::NotOnMazePoint {
                token: 1,
                position: Position::Goal
            }
            .to_string(),
            "token 1 is at GG, not on a maze point"
        );
    }

    #[test]
    #[should_panic(expected = "domain violation: token index 2 out of range")]
    fn test_fatal_panics() {
        fatal(DomainViolation::TokenOutOfRange(2));
    }
}
