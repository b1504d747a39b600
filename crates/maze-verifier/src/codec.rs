//! Configurations of the maze and their dense encoding.
//!
//! A configuration is everything the rules can look at: where both tokens
//! are, whether each one moved in the last round, and whether the box 60
//! rule is in force. Configurations with both tokens on boxes map one to
//! one onto `0..STATE_COUNT`.

use std::fmt;

use serde::Serialize;

use crate::error::{fatal, DomainViolation};
use crate::maze::{MazePoint, Position, Token, MAZE_POINT_COUNT};

/// Size of the state space: two positions, two movement flags, one mode flag
pub const STATE_COUNT: usize = MAZE_POINT_COUNT * MAZE_POINT_COUNT * 2 * 2 * 2;

/// Dense index of a configuration in `0..STATE_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateId(u16);

impl StateId {
    pub fn new(index: usize) -> Result<Self, DomainViolation> {
        if index < STATE_COUNT {
            Ok(Self(index as u16))
        } else {
            Err(DomainViolation::StateIdOutOfRange(index))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Exact inverse of [`Configuration::encode`]
    pub fn decode(self) -> Configuration {
        let mut rest = self.index();
        let red_text_override = rest % 2 == 1;
        rest /= 2;
        let ordinal_1 = rest % MAZE_POINT_COUNT;
        rest /= MAZE_POINT_COUNT;
        let ordinal_0 = rest % MAZE_POINT_COUNT;
        rest /= MAZE_POINT_COUNT;
        let moved_1 = rest % 2 == 1;
        rest /= 2;
        let moved_0 = rest % 2 == 1;

        let point = |ordinal| MazePoint::from_ordinal(ordinal).unwrap_or_else(|v| fatal(v));
        Configuration {
            tokens: [Position::At(point(ordinal_0)), Position::At(point(ordinal_1))],
            moved: [moved_0, moved_1],
            red_text_override,
        }
    }

    /// Every id, ascending
    pub fn all() -> impl Iterator<Item = StateId> {
        (0..STATE_COUNT as u16).map(StateId)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in the state space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub tokens: [Position; 2],
    /// Did the token move in the round that produced this configuration
    pub moved: [bool; 2],
    /// The box 60 rule: red text is ignored and tokens exit on "Yes"
    pub red_text_override: bool,
}

impl Configuration {
    /// Tokens on the given boxes, nothing moved yet, box 60 rule off
    pub fn at(token_0: MazePoint, token_1: MazePoint) -> Self {
        Self {
            tokens: [Position::At(token_0), Position::At(token_1)],
            moved: [false, false],
            red_text_override: false,
        }
    }

    pub fn position(&self, token: Token) -> Position {
        self.tokens[token.index()]
    }

    pub fn has_moved(&self, token: Token) -> bool {
        self.moved[token.index()]
    }

    /// The box under `token`, or a violation if it sits on a sentinel
    pub fn try_point(&self, token: Token) -> Result<MazePoint, DomainViolation> {
        let position = self.position(token);
        position.maze_point().ok_or(DomainViolation::NotOnMazePoint {
            token: token.index(),
            position,
        })
    }

    pub fn point(&self, token: Token) -> MazePoint {
        self.try_point(token).unwrap_or_else(|v| fatal(v))
    }

    /// Either token reached the goal
    pub fn is_goal(&self) -> bool {
        self.tokens.iter().any(|p| p.is_goal())
    }

    /// Either token is stuck on the illegal sentinel
    pub fn is_illegal(&self) -> bool {
        self.tokens.iter().any(|p| p.is_illegal())
    }

    pub fn try_encode(&self) -> Result<StateId, DomainViolation> {
        let ordinal_0 = self.try_point(Token::Zero)?.ordinal();
        let ordinal_1 = self.try_point(Token::One)?.ordinal();

        let mut index = usize::from(self.moved[0]);
        index = index * 2 + usize::from(self.moved[1]);
        index = index * MAZE_POINT_COUNT + ordinal_0;
        index = index * MAZE_POINT_COUNT + ordinal_1;
        index = index * 2 + usize::from(self.red_text_override);
        StateId::new(index)
    }

    /// Dense id of a configuration with both tokens on boxes
    pub fn encode(&self) -> StateId {
        self.try_encode().unwrap_or_else(|v| fatal(v))
    }

    /// All keyed configurations in dump order: movement flags set before
    /// clear, boxes ascending, box 60 rule on before off.
    pub fn enumerate() -> impl Iterator<Item = Configuration> {
        const FLAGS: [bool; 2] = [true, false];
        FLAGS.into_iter().flat_map(|moved_0| {
            FLAGS.into_iter().flat_map(move |moved_1| {
                MazePoint::all().flat_map(move |token_0| {
                    MazePoint::all().flat_map(move |token_1| {
                        FLAGS.into_iter().map(move |red_text_override| Configuration {
                            tokens: [Position::At(token_0), Position::At(token_1)],
                            moved: [moved_0, moved_1],
                            red_text_override,
                        })
                    })
                })
            })
        })
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |moved: bool| if moved { 'm' } else { '.' };
        write!(
            f,
            "({}{},{},{},{})",
            mark(self.moved[0]),
            mark(self.moved[1]),
            self.tokens[0],
            self.tokens[1],
            if self.red_text_override { '*' } else { ' ' }
        )
    }
}
