use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::questions::Question;

/// Answer speed thresholds in seconds.
pub const SLOW_ANSWER_SECS: f32 = 20.0;
pub const MEDIUM_ANSWER_SECS: f32 = 10.0;

/// How a quiz round ended. The discriminant is the number of board spaces
/// the player moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum Outcome {
    Wrong = -2,
    Inactivity = -1,
    CorrectSlow = 1,
    CorrectMedium = 2,
    CorrectFast = 3,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        matches!(
            self,
            Outcome::CorrectSlow | Outcome::CorrectMedium | Outcome::CorrectFast
        )
    }
}

/// Signed board movement awarded for a quiz round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepDelta(i32);

impl StepDelta {
    pub const fn wrong() -> Self {
        Self(Outcome::Wrong as i32)
    }

    pub const fn inactivity() -> Self {
        Self(Outcome::Inactivity as i32)
    }

    pub const fn correct_slow() -> Self {
        Self(Outcome::CorrectSlow as i32)
    }

    pub const fn correct_medium() -> Self {
        Self(Outcome::CorrectMedium as i32)
    }

    pub const fn correct_fast() -> Self {
        Self(Outcome::CorrectFast as i32)
    }

    /// Arbitrary movement, for hosts with their own scoring.
    pub const fn raw(steps: i32) -> Self {
        Self(steps)
    }

    /// Grade a correct answer by speed, or a wrong one.
    pub fn from_answer(correct: bool, elapsed_secs: f32) -> Self {
        if !correct {
            Self::wrong()
        } else if elapsed_secs >= SLOW_ANSWER_SECS {
            Self::correct_slow()
        } else if elapsed_secs >= MEDIUM_ANSWER_SECS {
            Self::correct_medium()
        } else {
            Self::correct_fast()
        }
    }

    pub const fn steps(self) -> i32 {
        self.0
    }

    /// The named category, when the delta is one of the standard values.
    pub fn outcome(self) -> Option<Outcome> {
        Outcome::iter().find(|outcome| *outcome as i32 == self.0)
    }
}

impl From<Outcome> for StepDelta {
    fn from(outcome: Outcome) -> Self {
        Self(outcome as i32)
    }
}

/// Score the answer at `answer_index`. `None` for an index with no answer.
pub fn evaluate_answer(question: &Question, answer_index: usize, elapsed_secs: f32) -> Option<StepDelta> {
    let answer = question.answers.get(answer_index)?;
    Some(StepDelta::from_answer(
        question.is_correct(&answer.id),
        elapsed_secs,
    ))
}
