// The play session state machine: which marker counts next, the quiz gate,
// board movement around the circular route, and lap tracking.
mod step;

use std::collections::HashSet;

use bevy::prelude::*;

use crate::questions::{Question, QuestionBank};
use crate::waypoints::{Waypoint, WaypointMapping, WaypointRegistry, marker_key};

pub use step::{MEDIUM_ANSWER_SECS, Outcome, SLOW_ANSWER_SECS, StepDelta, evaluate_answer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not started. Any known marker starts the session.
    #[default]
    Idle,
    AwaitingDetection,
    /// A question is on screen; new sightings are ignored.
    AwaitingAnswer,
}

/// Everything the engine reports to the host. Indices are board positions.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    ImageDetected(usize),
    UnexpectedImage(usize),
    SequenceReset,
    QuestionChanged(Option<Question>),
    NextTargetChanged(Option<usize>),
    LapCompleted(u32),
    GameOver,
    LastMarkerNameChanged(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub current: Option<usize>,
    pub expected_next: Option<usize>,
    pub has_answered: bool,
    pub laps_completed: u32,
    pub starting_index: Option<usize>,
    /// Signed steps taken since the starting waypoint.
    pub cumulative_steps: i64,
    /// Markers seen and still tracked. Keys are normalized marker names.
    pub notified: HashSet<String>,
    pub game_over_triggered: bool,
}

/// Result of a successfully applied answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerApplied {
    pub target: usize,
    pub laps_completed_now: u32,
}

#[derive(Resource, Debug)]
pub struct SequenceEngine {
    registry: WaypointRegistry,
    questions: QuestionBank,
    state: SessionState,
    auto_reset_on_sequence_end: bool,
    suspended: bool,
    events: Vec<SequenceEvent>,
}

impl SequenceEngine {
    pub fn new(
        registry: WaypointRegistry,
        questions: QuestionBank,
        auto_reset_on_sequence_end: bool,
    ) -> Self {
        if questions.is_loaded() {
            questions.validate_links(&registry);
        }
        Self {
            registry,
            questions,
            state: SessionState::default(),
            auto_reset_on_sequence_end,
            suspended: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_started(&self) -> bool {
        self.state.phase != Phase::Idle
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.state.phase == Phase::AwaitingAnswer
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn has_answered(&self) -> bool {
        self.state.has_answered
    }

    pub fn laps_completed(&self) -> u32 {
        self.state.laps_completed
    }

    pub fn registry(&self) -> &WaypointRegistry {
        &self.registry
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.state.current.and_then(|index| self.registry.get(index))
    }

    pub fn expected_waypoint(&self) -> Option<&Waypoint> {
        let index = self.state.expected_next?;
        let waypoint = self.registry.get(index);
        if waypoint.is_none() {
            warn!("Expected next board index {index} has no waypoint.");
        }
        waypoint
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        if !self.is_awaiting_answer() {
            return None;
        }
        self.current_waypoint()
            .and_then(|waypoint| self.questions.get(waypoint.question_id))
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<SequenceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed a marker sighting that already passed the pose gate. Returns
    /// whether the sighting was accepted.
    pub fn accept_detection(&mut self, marker: &str) -> bool {
        if self.suspended {
            return false;
        }
        if !self.questions.is_loaded() {
            debug!("Ignoring marker '{marker}': game data not loaded yet.");
            return false;
        }

        let key = marker_key(marker);
        if self.state.notified.contains(&key) {
            return false;
        }
        if self.state.phase == Phase::AwaitingAnswer {
            return false;
        }

        let Some(index) = self.registry.index_of(marker) else {
            warn!("No waypoint configured for marker '{marker}'.");
            return false;
        };

        match self.state.phase {
            Phase::Idle => {
                self.accept(index, key, true);
                true
            }
            Phase::AwaitingDetection => {
                match self.state.expected_next {
                    Some(expected) if expected != index => {
                        debug!("Marker '{marker}' is not the expected board index {expected}.");
                        self.events.push(SequenceEvent::UnexpectedImage(index));
                        return false;
                    }
                    None if !self.auto_reset_on_sequence_end => {
                        debug!("Sequence finished; ignoring '{marker}' until reset.");
                        return false;
                    }
                    _ => {}
                }
                self.accept(index, key, false);
                true
            }
            Phase::AwaitingAnswer => false,
        }
    }

    fn accept(&mut self, index: usize, key: String, bootstrap: bool) {
        let Some(waypoint) = self.registry.get(index).cloned() else {
            return;
        };

        self.state.notified.insert(key);
        if bootstrap {
            self.state.starting_index = Some(index);
            self.state.cumulative_steps = 0;
        }
        self.state.current = Some(index);
        let had_target = self.state.expected_next.take().is_some();

        info!("Accepted marker '{}' at board index {index}.", waypoint.marker);
        self.events.push(SequenceEvent::ImageDetected(index));
        self.events
            .push(SequenceEvent::LastMarkerNameChanged(waypoint.marker.clone()));
        if had_target {
            self.events.push(SequenceEvent::NextTargetChanged(None));
        }

        match self.questions.get(waypoint.question_id).cloned() {
            Some(question) => {
                self.state.phase = Phase::AwaitingAnswer;
                self.events
                    .push(SequenceEvent::QuestionChanged(Some(question)));
            }
            None => {
                warn!(
                    "Marker '{}' links question {} which is not loaded; no quiz this time.",
                    waypoint.marker, waypoint.question_id
                );
                self.state.phase = Phase::AwaitingDetection;
                // Without a question there is no next target, so the route ends here.
                if !bootstrap && self.auto_reset_on_sequence_end {
                    self.reset_internal(true, false, true);
                }
            }
        }
    }

    /// Move the board by `delta` from the current waypoint and arm the next
    /// target. Returns `None`, leaving state untouched, when no question is
    /// pending.
    pub fn apply_answer_outcome(&mut self, delta: StepDelta) -> Option<AnswerApplied> {
        if !self.is_started() {
            warn!("Answer outcome ignored: session not started.");
            return None;
        }
        let Some(current) = self.state.current else {
            warn!("Answer outcome ignored: no current marker.");
            return None;
        };
        if !self.is_awaiting_answer() {
            warn!("Answer outcome ignored: no question pending.");
            return None;
        }
        let count = self.registry.count() as i64;
        if count == 0 {
            warn!("Answer outcome ignored: no waypoints configured.");
            return None;
        }

        let steps = i64::from(delta.steps());
        let target = (current as i64 + steps).rem_euclid(count) as usize;
        let progress = self.state.cumulative_steps + steps;

        let mut laps = self.state.laps_completed;
        if steps > 0 {
            while progress >= (i64::from(laps) + 1) * count {
                laps += 1;
            }
        }
        let previous_laps = self.state.laps_completed;

        self.state.cumulative_steps = progress;
        self.state.laps_completed = laps;
        self.state.expected_next = Some(target);
        self.state.phase = Phase::AwaitingDetection;
        self.state.has_answered = true;

        debug!(
            "Moved {steps:+} from board index {current} to {target} (progress {progress}, laps {laps})."
        );

        self.events.push(SequenceEvent::QuestionChanged(None));
        for lap in previous_laps + 1..=laps {
            info!("Lap {lap} completed.");
            self.events.push(SequenceEvent::LapCompleted(lap));
            if !self.state.game_over_triggered {
                self.state.game_over_triggered = true;
                self.events.push(SequenceEvent::GameOver);
            }
        }
        self.events
            .push(SequenceEvent::NextTargetChanged(Some(target)));

        Some(AnswerApplied {
            target,
            laps_completed_now: laps - previous_laps,
        })
    }

    /// Back to `Idle` with every counter cleared.
    pub fn reset_sequence(&mut self) {
        info!("Sequence reset.");
        self.reset_internal(true, true, false);
    }

    /// Tracking was switched off: forget the session without announcing it.
    /// An open question is still withdrawn so the host can close it.
    pub fn deactivate(&mut self) {
        let had_question = self.is_awaiting_answer();
        self.reset_internal(false, true, false);
        if had_question {
            self.events.push(SequenceEvent::QuestionChanged(None));
        }
    }

    fn reset_internal(&mut self, announce: bool, clear_notified: bool, keep_current: bool) {
        let had_question = self.is_awaiting_answer();
        let had_target = self.state.expected_next.is_some();

        let current = if keep_current { self.state.current } else { None };
        let notified = if clear_notified {
            HashSet::new()
        } else {
            std::mem::take(&mut self.state.notified)
        };
        self.state = SessionState {
            current,
            notified,
            ..default()
        };

        if announce {
            if had_question {
                self.events.push(SequenceEvent::QuestionChanged(None));
            }
            if had_target {
                self.events.push(SequenceEvent::NextTargetChanged(None));
            }
            self.events.push(SequenceEvent::SequenceReset);
        }
    }

    /// While suspended every sighting is dropped. Resuming forgets which
    /// markers were already seen so one still in view can trigger again.
    pub fn set_detection_suspended(&mut self, suspended: bool) {
        if self.suspended == suspended {
            return;
        }
        self.suspended = suspended;
        if !suspended {
            self.state.notified.clear();
        }
    }

    /// Tracking of `marker` was lost. Returns whether it had been seen.
    pub fn marker_lost(&mut self, marker: &str) -> bool {
        self.state.notified.remove(&marker_key(marker))
    }

    /// Swap in freshly loaded questions. A pending question is re-announced
    /// in the new language.
    pub fn replace_questions(&mut self, questions: QuestionBank) {
        questions.validate_links(&self.registry);
        self.questions = questions;

        if !self.is_awaiting_answer() {
            return;
        }
        match self.current_question().cloned() {
            Some(question) => self
                .events
                .push(SequenceEvent::QuestionChanged(Some(question))),
            None => warn!("Pending question vanished from the reloaded game data."),
        }
    }

    /// Rebuild the board from new mappings. The running session is reset.
    pub fn rebuild_waypoints<'a>(&mut self, mappings: impl IntoIterator<Item = &'a WaypointMapping>) {
        self.registry.build(mappings);
        if self.questions.is_loaded() {
            self.questions.validate_links(&self.registry);
        }
        self.reset_sequence();
    }
}
