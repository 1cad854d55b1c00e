// Quiz rounds: answer input, the inactivity timer, and the holds that follow
// an answer and a game over.
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::HuntSet;
use crate::config::GameConfig;
use crate::questions::Question;
use crate::sequence::{SequenceEngine, SequenceEvent, StepDelta, evaluate_answer};

pub struct QuizPlugin;

impl Plugin for QuizPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QuizRound>()
            .init_resource::<FeedbackHold>()
            .init_resource::<GameOverHold>()
            .add_message::<AnswerSelected>()
            .add_message::<ResetRequested>()
            .add_message::<QuizResolved>()
            .add_systems(
                Update,
                (
                    track_rounds,
                    answer_selection,
                    tick_round,
                    tick_feedback_hold,
                    tick_game_over_hold,
                    handle_reset_requests,
                )
                    .chain()
                    .in_set(HuntSet::Quiz),
            );
    }
}

/// The player picked the answer at this index.
#[derive(Message, Debug, Clone, Copy)]
pub struct AnswerSelected(pub usize);

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetRequested;

/// A round ended and the board moved.
#[derive(Message, Debug, Clone)]
pub struct QuizResolved {
    pub question_id: u32,
    pub delta: StepDelta,
    pub elapsed: f32,
}

#[derive(Debug, Clone)]
pub struct ActiveRound {
    pub question: Question,
    pub elapsed: f32,
}

/// The question on screen and how long it has been open.
#[derive(Resource, Debug, Default)]
pub struct QuizRound(pub Option<ActiveRound>);

impl QuizRound {
    /// Seconds left before the round times out. Zero when no round is open.
    pub fn remaining(&self, max_question_time: f32) -> f32 {
        self.0
            .as_ref()
            .map_or(0.0, |round| (max_question_time - round.elapsed).max(0.0))
    }
}

/// Seconds left before detection resumes after an answer.
#[derive(Resource, Debug, Default)]
pub struct FeedbackHold(pub Option<f32>);

/// Seconds left on the game over screen before the session resets.
#[derive(Resource, Debug, Default)]
pub struct GameOverHold(pub Option<f32>);

fn track_rounds(
    mut events: MessageReader<SequenceEvent>,
    mut round: ResMut<QuizRound>,
    hold: Res<FeedbackHold>,
    mut game_over: ResMut<GameOverHold>,
    mut engine: ResMut<SequenceEngine>,
) {
    for event in events.read() {
        match event {
            SequenceEvent::QuestionChanged(Some(question)) => {
                // A reload re-announces the same question; keep its clock.
                let elapsed = round
                    .0
                    .as_ref()
                    .filter(|active| active.question.id == question.id)
                    .map_or(0.0, |active| active.elapsed);
                round.0 = Some(ActiveRound {
                    question: question.clone(),
                    elapsed,
                });
            }
            SequenceEvent::QuestionChanged(None) => round.0 = None,
            SequenceEvent::SequenceReset => {
                round.0 = None;
                // Reset from elsewhere while the game over screen was up.
                if game_over.0.take().is_some() && hold.0.is_none() {
                    engine.set_detection_suspended(false);
                }
            }
            _ => {}
        }
    }
}

/// Apply `delta` to the engine and start the feedback hold. A first lap also
/// starts the game over hold, which keeps detection off until it resets.
fn resolve_round(
    delta: StepDelta,
    round: &mut QuizRound,
    holds: &mut Holds<'_>,
    engine: &mut SequenceEngine,
    config: &GameConfig,
    resolved: &mut MessageWriter<QuizResolved>,
) {
    let Some(active) = round.0.take() else {
        return;
    };
    let was_over = engine.state().game_over_triggered;
    if engine.apply_answer_outcome(delta).is_none() {
        return;
    }
    if !was_over && engine.state().game_over_triggered {
        info!("Game over.");
        holds.game_over.0 = Some(config.game_over_hold);
    }

    resolved.write(QuizResolved {
        question_id: active.question.id,
        delta,
        elapsed: active.elapsed,
    });
    engine.set_detection_suspended(true);
    holds.feedback.0 = Some(config.feedback_display_duration);
}

#[derive(SystemParam)]
struct Holds<'w> {
    feedback: ResMut<'w, FeedbackHold>,
    game_over: ResMut<'w, GameOverHold>,
}

fn answer_selection(
    mut answers: MessageReader<AnswerSelected>,
    mut round: ResMut<QuizRound>,
    mut holds: Holds,
    mut engine: ResMut<SequenceEngine>,
    config: Res<GameConfig>,
    mut resolved: MessageWriter<QuizResolved>,
) {
    for AnswerSelected(index) in answers.read() {
        let Some(active) = round.0.as_ref() else {
            debug!("Answer {index} ignored: no question open.");
            continue;
        };
        let Some(delta) = evaluate_answer(&active.question, *index, active.elapsed) else {
            warn!(
                "Answer {index} does not exist for question {}.",
                active.question.id
            );
            continue;
        };

        info!(
            "Answer {index} for question {} after {:.1}s: {delta:?}.",
            active.question.id, active.elapsed
        );
        resolve_round(
            delta,
            &mut round,
            &mut holds,
            &mut engine,
            &config,
            &mut resolved,
        );
    }
}

fn tick_round(
    time: Res<Time>,
    mut round: ResMut<QuizRound>,
    mut holds: Holds,
    mut engine: ResMut<SequenceEngine>,
    config: Res<GameConfig>,
    mut resolved: MessageWriter<QuizResolved>,
) {
    // Tracking can be switched off mid-question without a reset announcement.
    if round.0.is_some() && !engine.is_awaiting_answer() {
        round.0 = None;
    }
    let Some(active) = round.0.as_mut() else {
        return;
    };
    active.elapsed += time.delta_secs();

    // Zero disables the timeout.
    if config.max_question_time > 0.0 && active.elapsed >= config.max_question_time {
        info!("Question {} timed out.", active.question.id);
        resolve_round(
            StepDelta::inactivity(),
            &mut round,
            &mut holds,
            &mut engine,
            &config,
            &mut resolved,
        );
    }
}

fn tick_feedback_hold(
    time: Res<Time>,
    mut hold: ResMut<FeedbackHold>,
    game_over: Res<GameOverHold>,
    mut engine: ResMut<SequenceEngine>,
) {
    let Some(remaining) = hold.0.as_mut() else {
        return;
    };
    *remaining -= time.delta_secs();
    if *remaining <= 0.0 {
        hold.0 = None;
        if game_over.0.is_none() {
            engine.set_detection_suspended(false);
        }
    }
}

fn tick_game_over_hold(
    time: Res<Time>,
    mut game_over: ResMut<GameOverHold>,
    hold: Res<FeedbackHold>,
    mut engine: ResMut<SequenceEngine>,
) {
    let Some(remaining) = game_over.0.as_mut() else {
        return;
    };
    *remaining -= time.delta_secs();
    if *remaining <= 0.0 {
        game_over.0 = None;
        engine.reset_sequence();
        if hold.0.is_none() {
            engine.set_detection_suspended(false);
        }
    }
}

fn handle_reset_requests(
    mut requests: MessageReader<ResetRequested>,
    mut round: ResMut<QuizRound>,
    mut hold: ResMut<FeedbackHold>,
    mut game_over: ResMut<GameOverHold>,
    mut engine: ResMut<SequenceEngine>,
) {
    if requests.read().count() == 0 {
        return;
    }
    round.0 = None;
    hold.0 = None;
    game_over.0 = None;
    engine.set_detection_suspended(false);
    engine.reset_sequence();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_clamps_at_zero() {
        let mut round = QuizRound::default();
        assert_eq!(round.remaining(30.0), 0.0);

        round.0 = Some(ActiveRound {
            question: Question::default(),
            elapsed: 12.0,
        });
        assert_eq!(round.remaining(30.0), 18.0);
        assert_eq!(round.remaining(10.0), 0.0);
    }
}
