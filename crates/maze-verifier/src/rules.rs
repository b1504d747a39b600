//! Decision rules of the maze.
//!
//! Choosing a token means following the sentence in the box under it. Most
//! boxes ask a yes/no question about the box under the *other* token; a few
//! change the rules themselves. [`evaluate`] computes where the chosen token
//! (and, for box 61, the other token) ends up.

use serde::Serialize;

use crate::codec::Configuration;
use crate::error::{fatal, DomainViolation};
use crate::maze::{MazePoint, Position, Token};

/// Which exit a rule took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Left on the path marked "Yes"
    Yes,
    /// Left on the path marked "No"
    No,
    /// Free choice between two exits
    Choice,
    /// Both tokens wait on each other; neither can leave
    Deadlock,
}

/// Result of choosing one token in a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub verdict: Verdict,
    pub primary: Configuration,
    /// Second successor, only for [`Verdict::Choice`]
    pub alternate: Option<Configuration>,
}

impl Outcome {
    /// All successors, primary first
    pub fn successors(&self) -> impl Iterator<Item = Configuration> + '_ {
        std::iter::once(self.primary).chain(self.alternate)
    }
}

/// A single move under construction
struct Move<'a> {
    current: &'a Configuration,
    token: Token,
}

impl Move<'_> {
    fn other(&self) -> MazePoint {
        self.current.point(self.token.other())
    }

    /// Successor with only the chosen token relocated
    fn to(&self, target: impl Into<Position>) -> Configuration {
        let mut next = *self.current;
        next.moved = [false, false];
        next.tokens[self.token.index()] = target.into();
        next.moved[self.token.index()] = true;
        next
    }

    fn exit(&self, verdict: Verdict, target: impl Into<Position>) -> Outcome {
        Outcome {
            verdict,
            primary: self.to(target),
            alternate: None,
        }
    }

    fn branch(&self, condition: bool, yes: u8, no: u8) -> Outcome {
        if condition {
            self.exit(Verdict::Yes, box_at(yes))
        } else {
            self.exit(Verdict::No, box_at(no))
        }
    }
}

fn box_at(code: u8) -> MazePoint {
    MazePoint::new(code).unwrap_or_else(|v| fatal(v))
}

/// Follow the rule in the box under `token`.
///
/// Both tokens must sit on boxes; anything else is a domain violation. The
/// configuration is only read, the result describes the next round.
pub fn evaluate(current: &Configuration, token: Token) -> Outcome {
    try_evaluate(current, token).unwrap_or_else(|v| fatal(v))
}

/// [`evaluate`] returning the violation instead of aborting
pub fn try_evaluate(current: &Configuration, token: Token) -> Result<Outcome, DomainViolation> {
    let point = current.try_point(token)?;
    current.try_point(token.other())?;

    let step = Move { current, token };
    // Box 60 rule: red text is not read, the token exits on "Yes".
    let skip_text = current.red_text_override && point.has_red_text();

    let outcome = match point.code() {
        // "Does the other pencil point to a box that has either red text or green text?"
        1 => step.branch(step.other().has_colored_text(), 2, 9),
        // "Does the other pencil point to a box that has green text or the word green?"
        2 => step.branch(step.other().has_green_text_or_word(), 7, 15),
        // "Does the other pencil point to text that has the word red or the word green?"
        5 => step.branch(step.other().has_color_word(), 25, 2),
        // "Is the other pencil in a box whose number is odd?"
        7 => step.branch(skip_text || step.other().is_odd(), 26, 5),
        // "On the last turn, did you move the other pencil?"
        9 => step.branch(skip_text || current.has_moved(token.other()), 2, 35),
        // "Is the other pencil in a box whose number is divisible by 5?"
        15 => step.branch(step.other().is_multiple_of_five(), 5, 40),
        // Same question as box 1, in red.
        25 => step.branch(skip_text || step.other().has_colored_text(), 7, 50),
        26 if skip_text => step.exit(Verdict::Yes, box_at(61)),
        26 => other_would_exit_no(&step)?,
        // "Does the other pencil point to text that has the word word?"
        35 => step.branch(step.other().has_word_word(), 40, 1),
        // "Is the text in this box green?" It is red, unless the box 60
        // rule makes the token skip the question.
        40 => step.branch(skip_text, 65, 60),
        50 if skip_text || step.other().refers_to_cows() => {
            step.exit(Verdict::Yes, Position::Goal)
        }
        50 => step.exit(Verdict::No, box_at(26)),
        // Free choice: exit on "Yes" or on "Lugnut".
        55 => {
            let primary = step.to(box_at(15));
            let mut alternate = primary;
            alternate.tokens[token.index()] = Position::At(box_at(7));
            Outcome {
                verdict: Verdict::Choice,
                primary,
                alternate: Some(alternate),
            }
        }
        // "Until further notice, ignore red text."
        60 => {
            let mut outcome = step.exit(Verdict::Yes, box_at(25));
            outcome.primary.red_text_override = true;
            outcome
        }
        61 if skip_text => step.exit(Verdict::Yes, box_at(1)),
        // "Move the other pencil on the path marked Yes, then this one."
        61 => {
            let other = token.other();
            let mut outcome = step.exit(Verdict::Yes, box_at(1));
            outcome.primary.tokens[other.index()] = step.other().yes_jump()?;
            outcome.primary.moved[other.index()] = true;
            outcome
        }
        // "Cancel the rule of box 60."
        65 => {
            let mut outcome = step.exit(Verdict::Yes, box_at(75));
            outcome.primary.red_text_override = false;
            outcome
        }
        // "Does the other pencil point to text that begins with If?"
        75 => step.branch(step.other().begins_with_if(), 1, 50),
        code => return Err(DomainViolation::UndefinedRule(code)),
    };
    Ok(outcome)
}

/// Box 26: "If you had chosen the other pencil, would it exit on a path
/// marked No?"
///
/// Answered by evaluating the other token once. That nested evaluation can
/// never come back here, because two tokens on 26 are caught first.
fn other_would_exit_no(step: &Move<'_>) -> Result<Outcome, DomainViolation> {
    if step.other().code() == 26 {
        let mut stuck = *step.current;
        stuck.tokens = [Position::Illegal, Position::Illegal];
        stuck.moved = [false, false];
        return Ok(Outcome {
            verdict: Verdict::Deadlock,
            primary: stuck,
            alternate: None,
        });
    }

    let nested = try_evaluate(step.current, step.token.other())?;
    Ok(step.branch(nested.verdict == Verdict::No, 61, 55))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(code: u8) -> MazePoint {
        MazePoint::new(code).unwrap()
    }

    fn config(token_0: u8, token_1: u8) -> Configuration {
        Configuration::at(point(token_0), point(token_1))
    }

    fn positions(config: &Configuration) -> [Position; 2] {
        config.tokens
    }

    #[test]
    fn test_box_1_reads_text_color() {
        let outcome = evaluate(&config(1, 7), Token::Zero);
        assert_eq!(outcome.verdict, Verdict::Yes);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(2)));

        let outcome = evaluate(&config(1, 35), Token::Zero);
        assert_eq!(outcome.verdict, Verdict::No);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(9)));
        assert_eq!(outcome.alternate, None);
    }

    #[test]
    fn test_movement_flags_follow_the_chosen_token() {
        let mut current = config(35, 2);
        current.moved = [true, true];
        let outcome = evaluate(&current, Token::One);
        assert_eq!(outcome.primary.moved, [false, true]);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(35)));
    }

    #[test]
    fn test_box_9_reads_movement() {
        let mut current = config(9, 1);
        current.moved = [false, true];
        assert_eq!(
            evaluate(&current, Token::Zero).primary.position(Token::Zero),
            Position::At(point(2))
        );
        current.moved = [true, false];
        assert_eq!(
            evaluate(&current, Token::Zero).primary.position(Token::Zero),
            Position::At(point(35))
        );
    }

    #[test]
    fn test_box_55_offers_a_choice() {
        let outcome = evaluate(&config(7, 55), Token::One);
        assert_eq!(outcome.verdict, Verdict::Choice);
        assert_eq!(outcome.primary.position(Token::One), Position::At(point(15)));
        let alternate = outcome.alternate.unwrap();
        assert_eq!(alternate.position(Token::One), Position::At(point(7)));
        assert_eq!(alternate.moved, outcome.primary.moved);
        assert_eq!(outcome.successors().count(), 2);
    }

    #[test]
    fn test_only_box_55_has_an_alternate() {
        for current in Configuration::enumerate() {
            for token in Token::BOTH {
                let outcome = evaluate(&current, token);
                let on_55 = current.point(token).code() == 55;
                assert_eq!(outcome.alternate.is_some(), on_55);
                assert_eq!(outcome.verdict == Verdict::Choice, on_55);
            }
        }
    }

    #[test]
    fn test_both_on_26_deadlock() {
        let outcome = evaluate(&config(26, 26), Token::Zero);
        assert_eq!(outcome.verdict, Verdict::Deadlock);
        assert_eq!(positions(&outcome.primary), [Position::Illegal; 2]);
        assert!(outcome.primary.is_illegal());
    }

    #[test]
    fn test_box_26_under_override_skips_the_question() {
        let mut current = config(26, 26);
        current.red_text_override = true;
        let outcome = evaluate(&current, Token::Zero);
        assert_eq!(outcome.verdict, Verdict::Yes);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(61)));
        assert!(outcome.primary.red_text_override);
    }

    #[test]
    fn test_box_26_asks_the_other_token() {
        // Other token on 35 facing 26: no "word" in 26, so it would exit No.
        let outcome = evaluate(&config(26, 35), Token::Zero);
        assert_eq!(outcome.verdict, Verdict::Yes);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(61)));

        // Other token on 1 facing red text 26 would exit Yes.
        let outcome = evaluate(&config(26, 1), Token::Zero);
        assert_eq!(outcome.verdict, Verdict::No);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(55)));

        // A choice is not a No.
        let outcome = evaluate(&config(55, 26), Token::One);
        assert_eq!(outcome.primary.position(Token::One), Position::At(point(55)));
    }

    #[test]
    fn test_box_60_turns_on_override() {
        let outcome = evaluate(&config(60, 35), Token::Zero);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(25)));
        assert!(outcome.primary.red_text_override);
    }

    #[test]
    fn test_box_65_turns_off_override() {
        let mut current = config(65, 35);
        current.red_text_override = true;
        let outcome = evaluate(&current, Token::Zero);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(75)));
        assert!(!outcome.primary.red_text_override);
    }

    #[test]
    fn test_override_survives_until_box_65() {
        // 40 -> 60 -> 25 -> 7 -> 26 -> 61 -> 1, then the other token 15 -> 40 -> 65 -> 75.
        let mut current = config(40, 15);
        let mut trail = Vec::new();
        for token in [
            Token::Zero,
            Token::Zero,
            Token::Zero,
            Token::Zero,
            Token::Zero,
            Token::Zero,
            Token::One,
            Token::One,
            Token::One,
        ] {
            current = evaluate(&current, token).primary;
            trail.push((current.position(token), current.red_text_override));
        }
        let expected = [
            (60, false),
            (25, true),
            (7, true),
            (26, true),
            (61, true),
            (1, true),
            (40, true),
            (65, true),
            (75, false),
        ];
        for ((position, flag), (code, expected_flag)) in trail.into_iter().zip(expected) {
            assert_eq!(position, Position::At(point(code)));
            assert_eq!(flag, expected_flag);
        }
    }

    #[test]
    fn test_box_61_moves_the_other_token() {
        let outcome = evaluate(&config(61, 40), Token::Zero);
        assert_eq!(
            positions(&outcome.primary),
            [Position::At(point(1)), Position::At(point(65))]
        );
        assert_eq!(outcome.primary.moved, [true, true]);

        let outcome = evaluate(&config(50, 61), Token::One);
        assert_eq!(positions(&outcome.primary), [Position::Goal, Position::At(point(1))]);
        assert!(outcome.primary.is_goal());
    }

    #[test]
    fn test_box_61_under_override_moves_only_itself() {
        let mut current = config(61, 40);
        current.red_text_override = true;
        let outcome = evaluate(&current, Token::Zero);
        assert_eq!(
            positions(&outcome.primary),
            [Position::At(point(1)), Position::At(point(40))]
        );
        assert_eq!(outcome.primary.moved, [true, false]);
    }

    #[test]
    fn test_box_50_goal() {
        let outcome = evaluate(&config(50, 50), Token::Zero);
        assert_eq!(outcome.primary.position(Token::Zero), Position::Goal);

        let outcome = evaluate(&config(50, 1), Token::Zero);
        assert_eq!(outcome.primary.position(Token::Zero), Position::At(point(26)));

        let mut current = config(50, 1);
        current.red_text_override = true;
        let outcome = evaluate(&current, Token::Zero);
        assert_eq!(outcome.primary.position(Token::Zero), Position::Goal);
    }

    #[test]
    fn test_sentinel_position_is_a_violation() {
        let mut current = config(1, 7);
        current.tokens[1] = Position::Illegal;
        assert_eq!(
            try_evaluate(&current, Token::Zero),
            Err(DomainViolation::NotOnMazePoint {
                token: 1,
                position: Position::Illegal
            })
        );
    }

    #[test]
    #[should_panic(expected = "domain violation")]
    fn test_goal_position_is_fatal() {
        let mut current = config(1, 7);
        current.tokens[0] = Position::Goal;
        evaluate(&current, Token::Zero);
    }
}
