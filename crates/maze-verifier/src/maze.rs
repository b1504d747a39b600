//! The boxes of the cows maze and what is written in them.
//!
//! Each box carries a number and a sentence; the decision rules in
//! [`crate::rules`] ask questions about the box the *other* token sits on,
//! so every property a rule can ask about is a predicate here.

use std::fmt;

use serde::Serialize;

use crate::error::{fatal, DomainViolation};

/// Box codes in ascending order. A box's index in this list is its ordinal.
pub const MAZE_POINT_CODES: [u8; MAZE_POINT_COUNT] =
    [1, 2, 5, 7, 9, 15, 25, 26, 35, 40, 50, 55, 60, 61, 65, 75];

/// Number of boxes in the maze
pub const MAZE_POINT_COUNT: usize = 16;

/// A legal box of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MazePoint(u8);

impl MazePoint {
    /// Look up a box by its printed number
    pub fn new(code: u8) -> Result<Self, DomainViolation> {
        match MAZE_POINT_CODES.binary_search(&code) {
            Ok(_) => Ok(Self(code)),
            Err(_) => Err(DomainViolation::UnknownMazePoint(code)),
        }
    }

    /// Look up a box by its index in [`MAZE_POINT_CODES`]
    pub fn from_ordinal(ordinal: usize) -> Result<Self, DomainViolation> {
        MAZE_POINT_CODES
            .get(ordinal)
            .map(|&code| Self(code))
            .ok_or(DomainViolation::OrdinalOutOfRange(ordinal))
    }

    /// All boxes, in ordinal order
    pub fn all() -> impl DoubleEndedIterator<Item = MazePoint> + ExactSizeIterator {
        MAZE_POINT_CODES.iter().map(|&code| Self(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn ordinal(self) -> usize {
        MAZE_POINT_CODES
            .binary_search(&self.0)
            .unwrap_or_else(|_| fatal(DomainViolation::UnknownMazePoint(self.0)))
    }

    /// Box text is printed in red or in green
    pub fn has_colored_text(self) -> bool {
        matches!(self.0, 7 | 9 | 25 | 26 | 40 | 50 | 60 | 61)
    }

    /// Box text is printed in red. Under the box 60 rule these boxes are
    /// not read; the token leaves on the path marked "Yes".
    pub fn has_red_text(self) -> bool {
        matches!(self.0, 7 | 9 | 25 | 26 | 40 | 50 | 61)
    }

    /// Box text is green or contains the word "green"
    pub fn has_green_text_or_word(self) -> bool {
        matches!(self.0, 1 | 2 | 5 | 25 | 40 | 60 | 65)
    }

    /// Box text contains the word "red" or the word "green"
    pub fn has_color_word(self) -> bool {
        matches!(self.0, 1 | 2 | 5 | 25 | 40 | 60 | 65)
    }

    /// Box text contains the word "word"
    pub fn has_word_word(self) -> bool {
        matches!(self.0, 5 | 35)
    }

    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    pub fn is_multiple_of_five(self) -> bool {
        self.0 % 5 == 0
    }

    pub fn refers_to_cows(self) -> bool {
        self.0 == 50
    }

    /// Box text is a sentence beginning with "If"
    pub fn begins_with_if(self) -> bool {
        matches!(self.0, 26 | 61 | 65)
    }

    /// Where a token on this box lands when box 61 pushes it along its
    /// "Yes" path. This is the literal table printed in the maze, not a
    /// re-evaluation of the box's own rule.
    pub fn yes_jump(self) -> Result<Position, DomainViolation> {
        let target = match self.0 {
            1 => 2,
            2 => 7,
            5 => 25,
            7 => 26,
            9 => 2,
            15 => 5,
            25 => 7,
            26 => 61,
            35 => 40,
            40 => 65,
            50 => return Ok(Position::Goal),
            55 => 15,
            60 => 25,
            61 => 1,
            65 => 75,
            75 => 1,
            other => return Err(DomainViolation::UndefinedRule(other)),
        };
        Ok(Position::At(Self(target)))
    }
}

impl TryFrom<u8> for MazePoint {
    type Error = DomainViolation;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl fmt::Display for MazePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Honor width so dumps line up.
        fmt::Display::fmt(&self.0, f)
    }
}

/// Where a token rests: on a box, or on one of the two sentinels that only
/// ever appear as outcomes of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    At(MazePoint),
    Goal,
    Illegal,
}

impl Position {
    pub fn maze_point(self) -> Option<MazePoint> {
        match self {
            Position::At(point) => Some(point),
            Position::Goal | Position::Illegal => None,
        }
    }

    pub fn is_goal(self) -> bool {
        self == Position::Goal
    }

    pub fn is_illegal(self) -> bool {
        self == Position::Illegal
    }
}

impl From<MazePoint> for Position {
    fn from(point: MazePoint) -> Self {
        Position::At(point)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::At(point) => write!(f, "{:>2}", point),
            Position::Goal => f.write_str("GG"),
            Position::Illegal => f.write_str("XX"),
        }
    }
}

/// One of the two pencils placed on the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Token {
    Zero,
    One,
}

impl Token {
    pub const BOTH: [Token; 2] = [Token::Zero, Token::One];

    pub fn index(self) -> usize {
        match self {
            Token::Zero => 0,
            Token::One => 1,
        }
    }

    pub fn other(self) -> Token {
        match self {
            Token::Zero => Token::One,
            Token::One => Token::Zero,
        }
    }
}

impl TryFrom<usize> for Token {
    type Error = DomainViolation;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Token::Zero),
            1 => Ok(Token::One),
            _ => Err(DomainViolation::TokenOutOfRange(index)),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.index())
    }
}
